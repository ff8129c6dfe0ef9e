//! # Rendering Boundary
//!
//! The engine does not draw anything itself. It meshes chunks and hands the
//! finished buffers to a [`ChunkRenderer`], which owns the GPU side: uploading
//! buffers, binding the shared texture atlas, and recomputing bounds, normals
//! and tangents.

pub mod meshing;

use std::collections::HashMap;

use log::debug;

use self::meshing::mesh::MeshBuffers;
use crate::engine_state::voxels::chunk::ChunkPosition;

/// Consumer of finished chunk meshes.
pub trait ChunkRenderer {
    /// Replaces the renderable surface of a chunk with freshly built buffers.
    fn display_chunk(&mut self, position: ChunkPosition, mesh: MeshBuffers);

    /// Shows or hides a chunk without discarding its surface.
    fn set_chunk_active(&mut self, position: ChunkPosition, active: bool);

    /// Drops a chunk's surface for good.
    fn remove_chunk(&mut self, position: ChunkPosition);
}

/// Statistics kept by [`LoggingRenderer`] for each chunk it was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Number of quads in the latest mesh
    pub faces: usize,
    /// How many times the surface has been rebuilt
    pub uploads: usize,
    /// Whether the chunk is currently shown
    pub active: bool,
}

/// Headless renderer that only records what it would draw.
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    surfaces: HashMap<ChunkPosition, SurfaceStats>,
}

impl LoggingRenderer {
    /// Creates an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// What is known about a chunk's surface.
    pub fn surface(&self, position: ChunkPosition) -> Option<&SurfaceStats> {
        self.surfaces.get(&position)
    }

    /// Number of chunks currently shown.
    pub fn active_count(&self) -> usize {
        self.surfaces.values().filter(|s| s.active).count()
    }

    /// Total quads across shown chunks.
    pub fn active_faces(&self) -> usize {
        self.surfaces
            .values()
            .filter(|s| s.active)
            .map(|s| s.faces)
            .sum()
    }
}

impl ChunkRenderer for LoggingRenderer {
    fn display_chunk(&mut self, position: ChunkPosition, mesh: MeshBuffers) {
        debug!(
            "Displaying chunk {:?}: {} faces, {} vertex bytes",
            position,
            mesh.face_count(),
            mesh.vertex_bytes().len()
        );
        let surface = self.surfaces.entry(position).or_insert(SurfaceStats {
            faces: 0,
            uploads: 0,
            active: true,
        });
        surface.faces = mesh.face_count();
        surface.uploads += 1;
    }

    fn set_chunk_active(&mut self, position: ChunkPosition, active: bool) {
        if let Some(surface) = self.surfaces.get_mut(&position) {
            surface.active = active;
        }
    }

    fn remove_chunk(&mut self, position: ChunkPosition) {
        self.surfaces.remove(&position);
    }
}
