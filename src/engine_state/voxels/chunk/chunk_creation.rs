//! # Chunk Creation Module
//!
//! Fills a chunk's padded grid from the terrain field. The loops run one cell
//! past the chunk on every side: the horizontal overrun seeds the rim with the
//! neighbours' boundary cells and the vertical overrun seeds the floor and
//! ceiling cap rows.

use cgmath::Point3;

use super::{chunk_origin, Chunk, ChunkPosition, CHUNK_DIMENSION, CHUNK_HEIGHT};
use crate::engine_state::voxels::{block::Block, terrain::TerrainGenerator};

impl Chunk {
    /// Generates the full grid of the chunk at `position`.
    ///
    /// The surface height is sampled once per column and reused for every row.
    pub fn generate(position: ChunkPosition, terrain: &TerrainGenerator) -> Self {
        let mut chunk = Chunk::empty(position);
        let (origin_x, origin_z) = chunk_origin(position);

        for z in -1..=CHUNK_DIMENSION {
            for x in -1..=CHUNK_DIMENSION {
                let world_x = origin_x + x;
                let world_z = origin_z + z;
                let max_surface_height = terrain.max_surface_height(world_x, world_z);

                for y in -1..=CHUNK_HEIGHT {
                    let block = terrain
                        .classify(world_x, y, world_z, max_surface_height)
                        .map(|block_type| {
                            Block::new(block_type, Point3::new(x as i16, y as i16, z as i16))
                        });
                    chunk.set((x + 1) as usize, (y + 1) as usize, (z + 1) as usize, block);
                }
            }
        }

        chunk
    }
}
