use cgmath::Vector3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// Unit-cube corners of each face, indexed by `BlockSide as usize`.
///
/// Corners are listed upper-left, upper-right, lower-left, lower-right as seen
/// from outside the cube, matching the UV corner order of the catalog.
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // TOP
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    // BOTTOM
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0]],
    // LEFT
    [[0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]],
    // RIGHT
    [[1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0]],
    // BACK
    [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
    // FRONT
    [[1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
];

/// A single quad face of a unit cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face template for a block side.
    pub fn new(block_side: BlockSide) -> Self {
        Face { block_side }
    }

    /// The four corners of the face translated by `offset`.
    pub fn offset_vertices(&self, offset: Vector3<f32>) -> [[f32; 3]; 4] {
        FACE_CORNERS[self.block_side as usize].map(|corner| (Vector3::from(corner) + offset).into())
    }

    /// The two triangles of the face, for a face whose first vertex is `start`.
    ///
    /// The winding is fixed: `a b c` then `c b d`.
    pub fn triangles(start: u32) -> [u32; 6] {
        [start, start + 1, start + 2, start + 2, start + 1, start + 3]
    }
}
