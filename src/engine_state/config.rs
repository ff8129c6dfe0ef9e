//! # World Configuration
//!
//! Every tunable of the generator, the streamer and the worker pool lives in
//! one immutable `WorldConfig`, constructed once and shared by reference (or
//! `Arc`) into every generator and mesher call.

use std::{fs, path::Path};

use cgmath::Vector2;
use log::warn;
use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Range the seed offset is drawn from on each horizontal axis.
const SEED_OFFSET_RANGE: std::ops::Range<i32> = -10000..10000;

/// Generator, streaming and scheduling parameters.
///
/// All fields have defaults, so a JSON document only needs to name the values
/// it changes. Band thresholds are never validated: a degenerate band simply
/// produces no blocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Factor applied to block coordinates before sampling noise
    pub noise_scale: f64,
    /// 3D noise value at or above which a cave-band cell is solid
    pub set_block_threshold: f64,
    /// First row of the cave band; rows below it are bedrock
    pub cave_generation_min: i32,
    /// First row above the cave band
    pub cave_generation_max: i32,
    /// Lowest row the surface can reach
    pub surface_generation_min: i32,
    /// First row the surface can never reach
    pub surface_generation_max: i32,
    /// Seed used to derive the horizontal noise offset
    pub seed: u64,
    /// Streaming radius in chunks (Chebyshev distance)
    pub radius: i32,
    /// Number of background workers
    pub worker_count: usize,
    /// Requests a worker may service per gate opening
    pub batch_size: usize,
    /// Deactivated chunks kept for reactivation without regeneration
    pub inactive_cache_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            noise_scale: 0.05,
            set_block_threshold: 0.2,
            cave_generation_min: 4,
            cave_generation_max: 128,
            surface_generation_min: 120,
            surface_generation_max: 133,
            seed: 0,
            radius: 5,
            worker_count: 2,
            batch_size: 2,
            inactive_cache_capacity: 256,
        }
    }
}

impl WorldConfig {
    /// Parses a JSON document, filling unspecified fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str::<WorldConfig>(json)?.sanitized())
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Clamps values that would stall the pipeline instead of rejecting them.
    pub fn sanitized(mut self) -> Self {
        if self.worker_count == 0 {
            warn!("worker_count of 0 clamped to 1");
            self.worker_count = 1;
        }
        if self.batch_size == 0 {
            warn!("batch_size of 0 clamped to 1");
            self.batch_size = 1;
        }
        if self.radius < 0 {
            warn!("negative radius {} clamped to 0", self.radius);
            self.radius = 0;
        }
        if self.inactive_cache_capacity == 0 {
            warn!("inactive_cache_capacity of 0 clamped to 1");
            self.inactive_cache_capacity = 1;
        }
        self
    }

    /// The horizontal noise offset derived from the seed.
    ///
    /// Drawn as two integers so the same seed always lands on the same lattice.
    pub fn seed_offset(&self) -> Vector2<f64> {
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let x = rng.i32(SEED_OFFSET_RANGE);
        let z = rng.i32(SEED_OFFSET_RANGE);
        Vector2::new(x as f64, z as f64)
    }

    /// Height of the surface band.
    pub fn surface_thickness(&self) -> i32 {
        self.surface_generation_max - self.surface_generation_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorldConfig::from_json_str(r#"{ "radius": 2, "seed": 7 }"#).unwrap();
        assert_eq!(config.radius, 2);
        assert_eq!(config.seed, 7);
        assert_eq!(config.cave_generation_max, 128);
        assert_eq!(config.surface_thickness(), 13);
    }

    #[test]
    fn zero_pool_values_are_clamped() {
        let config =
            WorldConfig::from_json_str(r#"{ "worker_count": 0, "batch_size": 0 }"#).unwrap();
        assert_eq!(config.worker_count, 1);
        assert_eq!(config.batch_size, 1);
    }

    #[test]
    fn seed_offset_is_stable_per_seed() {
        let a = WorldConfig { seed: 99, ..Default::default() };
        let b = WorldConfig { seed: 99, ..Default::default() };
        assert_eq!(a.seed_offset(), b.seed_offset());
        assert!(a.seed_offset().x >= -10000.0 && a.seed_offset().x < 10000.0);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            WorldConfig::from_json_str("{ radius: }"),
            Err(EngineError::ConfigParse(_))
        ));
    }
}
