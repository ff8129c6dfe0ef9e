//! # Generation Tasks
//!
//! The unit of work a scheduler worker services, and what it hands back.
//!
//! ## Task Lifecycle
//! 1. The driving side submits a [`GenerationRequest`]: a fresh position to
//!    build, or an existing grid to remesh
//! 2. A worker pops it and calls [`GenerationRequest::process`]
//! 3. The [`GenerationResult`] lands in the scheduler's result sink
//! 4. The driving side takes it and integrates it into the world
//!
//! Grids travel by value. A grid handed to a regeneration request belongs to
//! the worker until it comes back inside the result, even when the work fails.

use std::panic::{self, AssertUnwindSafe};

use log::{debug, error};
use web_time::Instant;

use crate::engine_state::{
    rendering::meshing::{generate_mesh, mesh::MeshBuffers},
    voxels::{
        block::catalog::BlockTypeCatalog,
        chunk::{Chunk, ChunkPosition},
        terrain::TerrainGenerator,
    },
};

/// A request for background work on one chunk.
#[derive(Debug)]
pub enum GenerationRequest {
    /// Build the grid of a never-generated chunk, then mesh it
    Fresh(ChunkPosition),
    /// Remesh an existing grid without touching terrain
    Regenerate(Box<Chunk>),
}

impl GenerationRequest {
    /// The chunk this request is about.
    pub fn position(&self) -> ChunkPosition {
        match self {
            GenerationRequest::Fresh(position) => *position,
            GenerationRequest::Regenerate(grid) => grid.position,
        }
    }

    /// Services the request.
    ///
    /// A panic inside generation or meshing is caught here and reported as
    /// [`GenerationOutcome::Failed`], so a single bad item never takes its
    /// worker down.
    pub fn process(self, terrain: &TerrainGenerator, catalog: &BlockTypeCatalog) -> GenerationResult {
        let position = self.position();
        let started = Instant::now();

        let outcome = match self {
            GenerationRequest::Fresh(position) => {
                let built = panic::catch_unwind(AssertUnwindSafe(|| {
                    let grid = Chunk::generate(position, terrain);
                    let mesh = generate_mesh(&grid, catalog);
                    (Box::new(grid), mesh)
                }));
                match built {
                    Ok((grid, mesh)) => GenerationOutcome::Fresh { grid, mesh },
                    Err(cause) => {
                        error!(
                            "Generating chunk {:?} failed: {}",
                            position,
                            panic_message(cause.as_ref())
                        );
                        GenerationOutcome::Failed { grid: None }
                    }
                }
            }
            GenerationRequest::Regenerate(grid) => {
                match panic::catch_unwind(AssertUnwindSafe(|| generate_mesh(&grid, catalog))) {
                    Ok(mesh) => GenerationOutcome::Regenerated { grid, mesh },
                    Err(cause) => {
                        error!(
                            "Remeshing chunk {:?} failed: {}",
                            position,
                            panic_message(cause.as_ref())
                        );
                        GenerationOutcome::Failed { grid: Some(grid) }
                    }
                }
            }
        };

        debug!(
            "Chunk {:?} {} in {:?}",
            position,
            outcome.label(),
            started.elapsed()
        );

        GenerationResult { position, outcome }
    }
}

/// What a worker produced for one request.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// A newly built grid and its mesh
    Fresh {
        /// The generated grid
        grid: Box<Chunk>,
        /// Its surface
        mesh: MeshBuffers,
    },
    /// A remeshed grid, returned to its owner
    Regenerated {
        /// The grid that was handed in
        grid: Box<Chunk>,
        /// Its new surface
        mesh: MeshBuffers,
    },
    /// The work panicked. A regeneration still returns its grid.
    Failed {
        /// The grid that was handed in, if any
        grid: Option<Box<Chunk>>,
    },
}

impl GenerationOutcome {
    fn label(&self) -> &'static str {
        match self {
            GenerationOutcome::Fresh { .. } => "generated",
            GenerationOutcome::Regenerated { .. } => "remeshed",
            GenerationOutcome::Failed { .. } => "failed",
        }
    }
}

/// A published result, keyed by chunk position in the result sink.
#[derive(Debug)]
pub struct GenerationResult {
    /// The chunk the work was done for
    pub position: ChunkPosition,
    /// What came out of it
    pub outcome: GenerationOutcome,
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> &str {
    cause
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| cause.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use cgmath::{Point2, Point3};

    use super::*;
    use crate::engine_state::{
        config::WorldConfig,
        voxels::block::{block_type::BlockType, Block},
    };

    fn catalog() -> BlockTypeCatalog {
        BlockTypeCatalog::atlas_grid(4, 4, |block_type, _| block_type.id() as u32).unwrap()
    }

    #[test]
    fn fresh_request_builds_and_meshes() {
        let config = WorldConfig {
            cave_generation_max: 4,
            ..Default::default()
        };
        let terrain = TerrainGenerator::new(&config);
        let result = GenerationRequest::Fresh(Point2::new(1, 2)).process(&terrain, &catalog());

        assert_eq!(result.position, Point2::new(1, 2));
        match result.outcome {
            GenerationOutcome::Fresh { grid, mesh } => {
                assert_eq!(grid.position, Point2::new(1, 2));
                assert!(!mesh.is_empty());
                assert_eq!(mesh, generate_mesh(&grid, &catalog()));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn regeneration_returns_the_same_grid() {
        let terrain = TerrainGenerator::new(&WorldConfig::default());
        let mut grid = Chunk::empty(Point2::new(-4, 0));
        grid.set(3, 3, 3, Some(Block::new(BlockType::Stone, Point3::new(2, 2, 2))));

        let result = GenerationRequest::Regenerate(Box::new(grid)).process(&terrain, &catalog());
        assert_eq!(result.position, Point2::new(-4, 0));
        match result.outcome {
            GenerationOutcome::Regenerated { grid, mesh } => {
                assert_eq!(grid.solid_count(), 1);
                assert_eq!(mesh.face_count(), 6);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn panic_messages_are_recovered() {
        let cause = panic::catch_unwind(|| panic!("boom {}", 3)).unwrap_err();
        assert_eq!(panic_message(cause.as_ref()), "boom 3");
        let cause = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(cause.as_ref()), "static");
    }
}
