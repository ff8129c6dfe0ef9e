//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::{thread, time::Duration};

use cgmath::Point3;
use voxel_world::engine_state::{
    config::WorldConfig,
    rendering::{ChunkRenderer, LoggingRenderer},
    voxels::block::catalog::BlockTypeCatalog,
    EngineState,
};

/// A world without caves, so chunks build quickly in debug builds.
pub fn shallow_config(radius: i32, worker_count: usize, batch_size: usize) -> WorldConfig {
    WorldConfig {
        radius,
        worker_count,
        batch_size,
        seed: 42,
        cave_generation_max: 4,
        ..WorldConfig::default()
    }
}

pub fn catalog() -> BlockTypeCatalog {
    BlockTypeCatalog::atlas_grid(4, 4, |block_type, side| block_type.id() as u32 + side as u32)
        .unwrap()
}

pub fn engine(config: WorldConfig) -> EngineState<LoggingRenderer> {
    EngineState::new(config, catalog(), LoggingRenderer::new()).unwrap()
}

/// Ticks at least once, then until nothing is left in the pipeline.
pub fn settle<R: ChunkRenderer>(engine: &mut EngineState<R>, observer: Point3<f32>) {
    for _ in 0..20_000 {
        engine.tick(observer);
        if engine.is_settled() {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("engine did not settle");
}

/// World position at the centre of a chunk.
pub fn chunk_center(x: i32, z: i32) -> Point3<f32> {
    Point3::new(x as f32 * 16.0 + 8.0, 140.0, z as f32 * 16.0 + 8.0)
}
