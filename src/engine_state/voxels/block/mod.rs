//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, the per-face UV
//! catalog and the block cell stored in chunk grids.

use block_type::BlockType;
use cgmath::Point3;

pub mod block_side;
pub mod block_type;
pub mod catalog;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// A present cell in a chunk grid.
///
/// Air is `None` in the grid and never allocates. The local position is the
/// block's coordinate inside its chunk (rim cells carry `-1` or `N`) and is only
/// used to offset the mesher's unit-cube vertices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The type of this block.
    pub block_type: BlockType,
    /// Local position within the owning chunk.
    pub position: Point3<i16>,
}

impl Block {
    /// Creates a new block of the specified type at a local chunk position.
    pub fn new(block_type: BlockType, position: Point3<i16>) -> Self {
        Block {
            block_type,
            position,
        }
    }
}
