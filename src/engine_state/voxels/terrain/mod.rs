//! # Terrain Field Generator
//!
//! A pure function from world coordinates to an optional block type, driven by
//! four vertical bands:
//!
//! * below the cave band: bedrock, except the `y = -1` cap row which is left
//!   empty so bedrock's top is exposed without ever meshing its underside
//! * the cave band: solid where the 3D coherence noise reaches the occupancy
//!   threshold, typed by the ore/rock predicates
//! * between the bands: always air
//! * the surface band: solid below the column's surface height, grass on the
//!   topmost solid row and dirt underneath
//!
//! When the cave and surface bands overlap the cave rule wins.

pub mod coherence;
pub mod ore;

use cgmath::Vector2;

use self::{coherence::CoherenceNoise, ore::cave_block_type};
use super::block::block_type::BlockType;
use crate::engine_state::config::WorldConfig;

/// Terrain classification state derived once from the configuration.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    noise: CoherenceNoise,
    noise_scale: f64,
    set_block_threshold: f64,
    cave_generation_min: i32,
    cave_generation_max: i32,
    surface_generation_min: i32,
    surface_generation_max: i32,
    surface_thickness: f64,
    seed_offset: Vector2<f64>,
}

impl TerrainGenerator {
    /// Creates a generator for the given configuration.
    pub fn new(config: &WorldConfig) -> Self {
        TerrainGenerator {
            noise: CoherenceNoise::new(),
            noise_scale: config.noise_scale,
            set_block_threshold: config.set_block_threshold,
            cave_generation_min: config.cave_generation_min,
            cave_generation_max: config.cave_generation_max,
            surface_generation_min: config.surface_generation_min,
            surface_generation_max: config.surface_generation_max,
            surface_thickness: config.surface_thickness() as f64,
            seed_offset: config.seed_offset(),
        }
    }

    /// Scaled and seeded noise coordinates of a block.
    #[inline]
    fn noise_coordinates(&self, world_x: i32, local_y: i32, world_z: i32) -> (f64, f64, f64) {
        (
            world_x as f64 * self.noise_scale + self.seed_offset.x,
            local_y as f64 * self.noise_scale,
            world_z as f64 * self.noise_scale + self.seed_offset.y,
        )
    }

    /// The surface height of a column. Computed once per column and reused for
    /// every row in it.
    pub fn max_surface_height(&self, world_x: i32, world_z: i32) -> f64 {
        let (x, _, z) = self.noise_coordinates(world_x, 0, world_z);
        self.surface_generation_min as f64 + self.noise.noise_2d(x, z) * self.surface_thickness
    }

    /// Classifies a single cell.
    ///
    /// # Arguments
    /// * `world_x`, `world_z` - Horizontal block coordinates in world space
    /// * `local_y` - Row within the column (`-1` and `CHUNK_HEIGHT` are the cap rows)
    /// * `max_surface_height` - Result of `max_surface_height` for this column
    ///
    /// # Returns
    /// The block type, or `None` for air.
    pub fn classify(
        &self,
        world_x: i32,
        local_y: i32,
        world_z: i32,
        max_surface_height: f64,
    ) -> Option<BlockType> {
        if local_y >= self.cave_generation_min && local_y < self.cave_generation_max {
            let (x, y, z) = self.noise_coordinates(world_x, local_y, world_z);
            self.is_block_in_caves(x, y, z)
                .then(|| cave_block_type(&self.noise, x, y, z))
        } else if local_y < self.cave_generation_min {
            (local_y != -1).then_some(BlockType::Bedrock)
        } else if local_y >= self.surface_generation_min && local_y < self.surface_generation_max {
            if local_y < self.cave_generation_max {
                None
            } else {
                surface_block(local_y, max_surface_height)
            }
        } else {
            None
        }
    }

    /// Whether a cave-band cell is solid rock rather than hollow.
    #[inline]
    pub fn is_block_in_caves(&self, x: f64, y: f64, z: f64) -> bool {
        self.noise.noise_3d(x, y, z) >= self.set_block_threshold
    }
}

/// Surface-band rule: solid below the surface height, grass on the topmost row.
pub fn surface_block(local_y: i32, max_surface_height: f64) -> Option<BlockType> {
    let y = local_y as f64;
    if y >= max_surface_height {
        return None;
    }
    if y + 1.0 >= max_surface_height {
        Some(BlockType::Grass)
    } else {
        Some(BlockType::Dirt)
    }
}
