//! # Engine State Module
//!
//! The driving side of the engine. `EngineState` owns the world, the worker
//! pool and the renderer, and advances them one tick at a time.
//!
//! ## Key Components
//!
//! * `config` - Immutable generator, streaming and pool parameters
//! * `error` - The engine's error type
//! * `rendering` - The mesher and the renderer boundary
//! * `task_management` - The gated worker pool
//! * `voxels` - Blocks, chunks, terrain and the world
//!
//! ## Tick
//!
//! 1. Re-centre the world on the observer's chunk
//! 2. Submit the fresh builds and remeshes it asks for
//! 3. Take every published result and hand its mesh to the renderer
//! 4. Reopen the worker gates to admit the next batch
//!
//! The tick never blocks on a worker.

use std::sync::Arc;

use cgmath::Point3;
use log::{debug, info, warn};

use self::{
    config::WorldConfig,
    error::Result,
    rendering::ChunkRenderer,
    task_management::WorkScheduler,
    voxels::{
        block::{block_type::BlockType, catalog::BlockTypeCatalog},
        chunk::{chunk_position_of, ChunkPosition},
        terrain::TerrainGenerator,
        world::{Integration, RaycastHit, World},
    },
};

pub mod config;
pub mod error;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Summary of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Fresh builds submitted
    pub requested: usize,
    /// Remeshes submitted
    pub regenerated: usize,
    /// Chunks that left the radius
    pub deactivated: usize,
    /// Cached chunks that came back
    pub reactivated: usize,
    /// Worker results whose mesh was handed to the renderer
    pub integrated: usize,
    /// Worker results dropped: failed builds and chunks evicted in flight
    pub discarded: usize,
}

/// The chunk containing an observer at a world position.
pub fn observer_chunk(observer: Point3<f32>) -> ChunkPosition {
    chunk_position_of(observer.x.floor() as i32, observer.z.floor() as i32)
}

/// The main state container for the voxel world.
///
/// # Examples
///
/// ```no_run
/// use cgmath::Point3;
/// use voxel_world::engine_state::{
///     config::WorldConfig, rendering::LoggingRenderer,
///     voxels::block::catalog::BlockTypeCatalog, EngineState,
/// };
///
/// let catalog = BlockTypeCatalog::atlas_grid(4, 4, |t, _| t.id() as u32)?;
/// let mut engine = EngineState::new(WorldConfig::default(), catalog, LoggingRenderer::new())?;
/// engine.tick(Point3::new(8.0, 140.0, 8.0));
/// engine.shutdown();
/// # Ok::<(), voxel_world::engine_state::error::EngineError>(())
/// ```
pub struct EngineState<R: ChunkRenderer> {
    config: Arc<WorldConfig>,
    world: World,
    scheduler: WorkScheduler,
    renderer: R,
}

impl<R: ChunkRenderer> EngineState<R> {
    /// Creates the engine and starts its workers.
    ///
    /// # Arguments
    ///
    /// * `config` - Generator, streaming and pool parameters
    /// * `catalog` - Per-face UVs of every block type
    /// * `renderer` - Receives finished meshes
    ///
    /// # Returns
    ///
    /// The running engine, or the error that kept a worker from starting
    pub fn new(config: WorldConfig, catalog: BlockTypeCatalog, renderer: R) -> Result<Self> {
        let config = Arc::new(config.sanitized());
        info!(
            "Block catalog holds {} block types, streaming radius {}",
            catalog.len(),
            config.radius
        );

        let scheduler = WorkScheduler::new(
            config.worker_count,
            config.batch_size,
            TerrainGenerator::new(&config),
            Arc::new(catalog),
        )?;

        Ok(Self {
            world: World::new(&config),
            config,
            scheduler,
            renderer,
        })
    }

    /// Advances streaming and integration by one step.
    ///
    /// # Arguments
    ///
    /// * `observer` - World position the chunk set is kept around
    pub fn tick(&mut self, observer: Point3<f32>) -> TickReport {
        let update = self.world.update(observer_chunk(observer));
        let mut report = TickReport {
            requested: update.fresh.len(),
            regenerated: update.regenerate.len(),
            deactivated: update.deactivated.len(),
            reactivated: update.reactivated.len(),
            ..TickReport::default()
        };

        for position in update.deactivated {
            self.renderer.set_chunk_active(position, false);
        }
        for position in update.evicted {
            self.renderer.remove_chunk(position);
        }
        for position in update.reactivated {
            self.renderer.set_chunk_active(position, true);
        }

        for position in update.fresh {
            self.scheduler.submit_fresh(position);
        }
        for grid in update.regenerate {
            if let Some(stale) = self.scheduler.submit_regeneration(grid) {
                warn!("Replaced a pending remesh of chunk {:?}", stale.position);
            }
        }

        for result in self.scheduler.take_results() {
            match self.world.integrate(result) {
                Integration::Display {
                    position,
                    mesh,
                    active,
                } => {
                    report.integrated += 1;
                    self.renderer.display_chunk(position, mesh);
                    if !active {
                        self.renderer.set_chunk_active(position, false);
                    }
                }
                Integration::Discarded => report.discarded += 1,
            }
        }

        self.scheduler.open_gates();

        if report != TickReport::default() {
            debug!("Tick: {:?}", report);
        }
        report
    }

    /// Writes one block, or air for `None`. Remeshing happens on later ticks.
    pub fn set_block(&mut self, position: Point3<i32>, block_type: Option<BlockType>) -> Result<()> {
        self.world.set_block(position, block_type).map(|_| ())
    }

    /// Clears one block.
    pub fn remove_block(&mut self, position: Point3<i32>) -> Result<()> {
        self.world.remove_block(position).map(|_| ())
    }

    /// Removes the block a ray hit, if any.
    pub fn break_targeted(&mut self, hit: Option<RaycastHit>) -> Result<Option<Point3<i32>>> {
        self.world.break_targeted(hit)
    }

    /// Places a block against the face a ray hit, if any.
    pub fn place_targeted(
        &mut self,
        hit: Option<RaycastHit>,
        block_type: BlockType,
    ) -> Result<Option<Point3<i32>>> {
        self.world.place_targeted(hit, block_type)
    }

    /// Whether the world has been streamed at least once and nothing is
    /// queued, in flight, awaiting integration or awaiting a remesh.
    pub fn is_settled(&self) -> bool {
        self.world.center().is_some()
            && self.scheduler.is_idle()
            && self.scheduler.pending_counts() == (0, 0)
            && !self.world.has_outstanding_work()
            && !self.world.has_unmeshed_edits()
    }

    /// The world being streamed.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The renderer meshes are handed to.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The configuration the engine was started with, after clamping.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Stops the workers and waits for them to leave.
    pub fn shutdown(&mut self) {
        info!("Shutting down engine");
        self.scheduler.stop();
    }
}
