//! Coherence noise sampled by the terrain generator.
//!
//! Both fields are built on the same 2D Perlin primitive remapped to `[0, 1]`.
//! The 3D field is not native 3D noise: it averages six 2D lookups over every
//! ordered pair of axes, and terrain parity depends on keeping it that way.

use noise::{NoiseFn, Perlin};

/// Permutation seed of the underlying Perlin table. World variation comes
/// from the seed offset, not from this table.
const PERMUTATION_SEED: u32 = 0;

/// Deterministic, continuous noise with values in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct CoherenceNoise {
    perlin: Perlin,
}

impl Default for CoherenceNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl CoherenceNoise {
    /// Creates the noise source.
    pub fn new() -> Self {
        CoherenceNoise {
            perlin: Perlin::new(PERMUTATION_SEED),
        }
    }

    /// 2D noise in `[0, 1]`.
    #[inline]
    pub fn noise_2d(&self, x: f64, y: f64) -> f64 {
        let sample = self.perlin.get([x, y]);
        (sample * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// 3D noise in `[0, 1]`, the mean of the six ordered axis-pair lookups.
    #[inline]
    pub fn noise_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let ab = self.noise_2d(x, y);
        let bc = self.noise_2d(y, z);
        let ac = self.noise_2d(x, z);

        let ba = self.noise_2d(y, x);
        let cb = self.noise_2d(z, y);
        let ca = self.noise_2d(z, x);

        (ab + bc + ac + ba + cb + ca) / 6.0
    }
}
