//! Ore and rock placement inside the cave band.

use super::coherence::CoherenceNoise;
use crate::engine_state::voxels::block::block_type::BlockType;

/// A fixed (offset, scale, threshold) test against the 3D coherence noise.
///
/// A solid cave-band cell becomes `block_type` when the noise sampled at
/// `(coordinate + offset) * scale` is at or below `threshold`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrePredicate {
    /// Block placed when the predicate matches
    pub block_type: BlockType,
    /// Added to the noise coordinates before scaling
    pub offset: [f64; 3],
    /// Frequency multiplier
    pub scale: f64,
    /// Inclusive upper bound on the noise value
    pub threshold: f64,
}

impl OrePredicate {
    /// Tests the predicate at already scaled and seeded noise coordinates.
    #[inline]
    pub fn matches(&self, noise: &CoherenceNoise, x: f64, y: f64, z: f64) -> bool {
        noise.noise_3d(
            (x + self.offset[0]) * self.scale,
            (y + self.offset[1]) * self.scale,
            (z + self.offset[2]) * self.scale,
        ) <= self.threshold
    }
}

/// Predicates in priority order; the first match wins.
pub const ORE_PREDICATES: [OrePredicate; 7] = [
    OrePredicate {
        block_type: BlockType::CoalOre,
        offset: [-545.0, 124.0, 23.0],
        scale: 3.0,
        threshold: 0.35,
    },
    OrePredicate {
        block_type: BlockType::IronOre,
        offset: [1002.0, 1010.0, 1691.0],
        scale: 5.0,
        threshold: 0.31,
    },
    OrePredicate {
        block_type: BlockType::GoldOre,
        offset: [2512.0, -5313.0, 2143.0],
        scale: 8.0,
        threshold: 0.31,
    },
    OrePredicate {
        block_type: BlockType::DiamondOre,
        offset: [423.0, -512.0, -691.0],
        scale: 9.0,
        threshold: 0.29,
    },
    OrePredicate {
        block_type: BlockType::Granite,
        offset: [-123.0, -1235.0, 4231.0],
        scale: 1.8,
        threshold: 0.35,
    },
    OrePredicate {
        block_type: BlockType::Andesite,
        offset: [5525.0, 12341.0, -234.0],
        scale: 1.9,
        threshold: 0.35,
    },
    OrePredicate {
        block_type: BlockType::Diorite,
        offset: [-13.0, 1234.0, 5234.0],
        scale: 2.0,
        threshold: 0.35,
    },
];

/// Picks the rock type of a solid cave-band cell.
pub fn cave_block_type(noise: &CoherenceNoise, x: f64, y: f64, z: f64) -> BlockType {
    ORE_PREDICATES
        .iter()
        .find(|predicate| predicate.matches(noise, x, y, z))
        .map_or(BlockType::Stone, |predicate| predicate.block_type)
}
