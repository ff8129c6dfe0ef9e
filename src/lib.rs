#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! An infinite, procedurally generated voxel world streamed in full-height
//! chunk columns around a moving observer.
//!
//! ## Key Modules
//!
//! * `engine_state` - The driving side: configuration, errors, the world,
//!   the worker pool and the renderer boundary
//!
//! ## Architecture
//!
//! * Terrain is a pure function of world coordinates and the seed, so any chunk
//!   can be built on any thread in any order with the same result
//! * Chunks are stored in a padded grid whose rim mirrors the neighbours'
//!   border cells, so meshing never looks at another chunk
//! * A gated worker pool builds and remeshes chunks, admitting one batch per
//!   worker per tick
//! * Edits write into grids directly and are remeshed ahead of new terrain
//!
//! ## Usage
//!
//! ```no_run
//! // Headless demo
//! fn main() {
//!     voxel_world::run().unwrap();
//! }
//! ```

use std::{env, thread, time::Duration};

use cgmath::{Point3, Vector3};
use log::{info, warn};
use web_time::Instant;

use engine_state::{
    config::WorldConfig,
    error::Result,
    rendering::{ChunkRenderer, LoggingRenderer},
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType, catalog::BlockTypeCatalog},
        chunk::CHUNK_HEIGHT,
        world::RaycastHit,
    },
    EngineState,
};

pub mod engine_state;

/// Ticks the demo observer walks for.
const DEMO_STEPS: usize = 24;
/// Blocks the observer moves per tick.
const DEMO_STRIDE: f32 = 4.0;
/// Pause between ticks, standing in for a frame.
const TICK_INTERVAL: Duration = Duration::from_millis(16);
/// Ticks to wait for the pipeline to drain before giving up.
const SETTLE_LIMIT: usize = 10_000;

/// Runs the headless demo.
///
/// Arguments, both optional: a JSON world configuration and a JSON block
/// catalog. Without them the defaults and a built-in 4x4 atlas layout are used.
pub fn run() -> Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorldConfig::from_json_file(path)?,
        None => WorldConfig {
            radius: 3,
            ..WorldConfig::default()
        },
    };
    let catalog = match args.next() {
        Some(path) => BlockTypeCatalog::from_json_file(path)?,
        None => demo_catalog()?,
    };

    let started = Instant::now();
    let mut engine = EngineState::new(config, catalog, LoggingRenderer::new())?;

    let mut observer = Point3::new(8.0, 140.0, 8.0);
    for _ in 0..DEMO_STEPS {
        engine.tick(observer);
        observer.x += DEMO_STRIDE;
        thread::sleep(TICK_INTERVAL);
    }
    settle(&mut engine, observer);
    info!(
        "Walked {} blocks in {:?}: {} chunks shown, {} faces",
        DEMO_STEPS as f32 * DEMO_STRIDE,
        started.elapsed(),
        engine.renderer().active_count(),
        engine.renderer().active_faces()
    );

    let (x, z) = (observer.x.floor() as i32, observer.z.floor() as i32);
    if let Some(top) = highest_block(&engine, x, z) {
        let hit = RaycastHit {
            point: Point3::new(x as f32 + 0.5, (top + 1) as f32, z as f32 + 0.5),
            normal: Vector3::new(0.0, 1.0, 0.0),
        };
        let placed = engine.place_targeted(Some(hit), BlockType::DiamondOre)?;
        info!("Placed diamond ore at {:?}", placed);
        let broken = engine.break_targeted(Some(hit))?;
        info!("Broke the surface block at {:?}", broken);
        settle(&mut engine, observer);
    } else {
        warn!("No surface under the observer to edit");
    }

    info!(
        "Finished after {:?}: {} chunks shown, {} cached",
        started.elapsed(),
        engine.renderer().active_count(),
        engine.world().cached_count()
    );
    engine.shutdown();
    Ok(())
}

/// The layout of the built-in demo atlas: grass gets three tiles, every
/// other block type one.
fn demo_catalog() -> Result<BlockTypeCatalog> {
    BlockTypeCatalog::atlas_grid(4, 4, |block_type, side| match (block_type, side) {
        (BlockType::Grass, BlockSide::TOP) => 0,
        (BlockType::Grass, BlockSide::BOTTOM) => 2,
        (BlockType::Grass, _) => 1,
        (other, _) => other.id() as u32 + 2,
    })
}

fn settle<R: ChunkRenderer>(engine: &mut EngineState<R>, observer: Point3<f32>) {
    for _ in 0..SETTLE_LIMIT {
        engine.tick(observer);
        if engine.is_settled() {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    warn!("Pipeline did not settle within {} ticks", SETTLE_LIMIT);
}

fn highest_block<R: ChunkRenderer>(engine: &EngineState<R>, x: i32, z: i32) -> Option<i32> {
    (0..CHUNK_HEIGHT)
        .rev()
        .find(|&y| matches!(engine.world().block_at(Point3::new(x, y, z)), Ok(Some(_))))
}
