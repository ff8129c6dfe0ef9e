//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the grid offset of
//! the neighbour each face looks at.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// Represents the six possible faces of a voxel block.
///
/// The discriminants fix the order in which the mesher emits faces for a
/// block, which is also the order of the per-face UVs in the catalog.
///
/// The order is: [TOP, BOTTOM, LEFT, RIGHT, BACK, FRONT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSide {
    /// The top face (facing positive Y)
    TOP = 0,

    /// The bottom face (facing negative Y)
    BOTTOM = 1,

    /// The left face (facing negative X)
    LEFT = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The back face (facing negative Z)
    BACK = 4,

    /// The front face (facing positive Z)
    FRONT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in emission order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::BACK,
            BlockSide::FRONT,
        ]
    }

    /// The outward unit normal of this face, which is also the grid offset of
    /// the neighbour that can hide it.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
        }
    }
}
