//! # Block Type Module
//!
//! This module defines the closed set of block types the terrain generator can
//! produce and the player can place. Each type is resolved to a compact integer
//! id once, so the mesher never hashes names in its hot path.

use std::fmt;

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// Air is not a variant: an empty cell is represented by `None` in the chunk
/// grid, so absence never allocates. The `FromPrimitive` derive allows
/// conversion from the compact integer id.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, Serialize, Deserialize,
)]
pub enum BlockType {
    /// Indestructible floor layer below the cave band.
    Bedrock,
    /// Default cave-band rock when no ore or rock predicate matches.
    Stone,
    /// Surface fill under the topmost layer.
    Dirt,
    /// Topmost surface layer.
    Grass,
    /// Most common ore.
    #[serde(rename = "Coal Ore")]
    CoalOre,
    /// Iron ore.
    #[serde(rename = "Iron Ore")]
    IronOre,
    /// Gold ore.
    #[serde(rename = "Gold Ore")]
    GoldOre,
    /// Rarest ore.
    #[serde(rename = "Diamond Ore")]
    DiamondOre,
    /// Granite rock pocket.
    Granite,
    /// Andesite rock pocket.
    Andesite,
    /// Diorite rock pocket.
    Diorite,
}

/// Number of `BlockType` variants.
pub const BLOCK_TYPE_COUNT: usize = 11;

impl BlockType {
    /// Returns every block type in id order.
    pub fn all() -> [BlockType; BLOCK_TYPE_COUNT] {
        [
            BlockType::Bedrock,
            BlockType::Stone,
            BlockType::Dirt,
            BlockType::Grass,
            BlockType::CoalOre,
            BlockType::IronOre,
            BlockType::GoldOre,
            BlockType::DiamondOre,
            BlockType::Granite,
            BlockType::Andesite,
            BlockType::Diorite,
        ]
    }

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a block type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// The compact integer id of this type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Human readable name, matching the keys accepted in catalog files.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Bedrock => "Bedrock",
            BlockType::Stone => "Stone",
            BlockType::Dirt => "Dirt",
            BlockType::Grass => "Grass",
            BlockType::CoalOre => "Coal Ore",
            BlockType::IronOre => "Iron Ore",
            BlockType::GoldOre => "Gold Ore",
            BlockType::DiamondOre => "Diamond Ore",
            BlockType::Granite => "Granite",
            BlockType::Andesite => "Andesite",
            BlockType::Diorite => "Diorite",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
