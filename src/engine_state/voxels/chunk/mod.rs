//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one full-height column of blocks
//! stored in a padded grid. The grid is one cell larger than the chunk on every
//! side. The horizontal rim mirrors the neighbouring chunks' boundary cells and
//! the two vertical cap rows close the column, so the mesher can cull faces
//! without ever looking at another chunk.
//!
//! ## Coordinates
//!
//! Local block `(x, y, z)` in `0..CHUNK_DIMENSION, 0..CHUNK_HEIGHT, 0..CHUNK_DIMENSION`
//! lives at grid index `(x + 1, y + 1, z + 1)`. Grid `x = 0` and
//! `x = CHUNK_DIMENSION + 1` (and the same for `z`) are rim cells.

use cgmath::{Point2, Point3};

use super::block::Block;

mod chunk_creation;
pub mod chunk_iteration;

/// The horizontal dimension (width and depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The height of a chunk column in blocks.
pub const CHUNK_HEIGHT: i32 = 256;
/// The horizontal dimension of the padded grid.
pub const CHUNK_DIMENSION_WRAPPED: usize = (CHUNK_DIMENSION + 2) as usize;
/// The height of the padded grid.
pub const CHUNK_HEIGHT_WRAPPED: usize = (CHUNK_HEIGHT + 2) as usize;
/// The number of cells in one horizontal row plane (x by y) of the padded grid.
pub const CHUNK_PLANE_SIZE_WRAPPED: usize = CHUNK_DIMENSION_WRAPPED * CHUNK_HEIGHT_WRAPPED;
/// The total number of cells in the padded grid.
pub const CHUNK_SIZE_WRAPPED: usize = CHUNK_PLANE_SIZE_WRAPPED * CHUNK_DIMENSION_WRAPPED;

/// Position of a column in the horizontal chunk grid. `y` of the point is the
/// world z axis.
pub type ChunkPosition = Point2<i32>;

/// Converts a world block column to the chunk that owns it.
#[inline]
pub fn chunk_position_of(world_x: i32, world_z: i32) -> ChunkPosition {
    Point2::new(
        world_x.div_euclid(CHUNK_DIMENSION),
        world_z.div_euclid(CHUNK_DIMENSION),
    )
}

/// Converts a world block column to its local column inside the owning chunk.
#[inline]
pub fn local_column_of(world_x: i32, world_z: i32) -> (i32, i32) {
    (
        world_x.rem_euclid(CHUNK_DIMENSION),
        world_z.rem_euclid(CHUNK_DIMENSION),
    )
}

/// World block coordinates of a chunk's local origin.
#[inline]
pub fn chunk_origin(position: ChunkPosition) -> (i32, i32) {
    (position.x * CHUNK_DIMENSION, position.y * CHUNK_DIMENSION)
}

/// A full-height column of blocks with a one-cell mirrored rim.
///
/// A chunk is owned by exactly one side at a time: the world while it is
/// tracked, or the worker currently rebuilding its mesh.
#[derive(Clone)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates.
    pub position: ChunkPosition,
    /// Padded grid, `None` for air. See `grid_index` for the layout.
    blocks: Vec<Option<Block>>,
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("position", &self.position)
            .field("solid_cells", &self.solid_count())
            .finish()
    }
}

/// Flat index of a padded-grid cell.
#[inline]
pub fn grid_index(gx: usize, gy: usize, gz: usize) -> usize {
    gx + CHUNK_DIMENSION_WRAPPED * gy + CHUNK_PLANE_SIZE_WRAPPED * gz
}

impl Chunk {
    /// Creates a chunk whose every cell, rim included, is air.
    pub fn empty(position: ChunkPosition) -> Self {
        Chunk {
            position,
            blocks: vec![None; CHUNK_SIZE_WRAPPED],
        }
    }

    /// The block stored at a padded-grid cell.
    ///
    /// # Panics
    /// Panics if the cell is outside the padded grid.
    #[inline]
    pub fn get(&self, gx: usize, gy: usize, gz: usize) -> Option<Block> {
        self.blocks[grid_index(gx, gy, gz)]
    }

    /// Whether a padded-grid cell holds a block.
    #[inline]
    pub fn is_block_solid(&self, gx: usize, gy: usize, gz: usize) -> bool {
        self.blocks[grid_index(gx, gy, gz)].is_some()
    }

    /// Writes a padded-grid cell.
    ///
    /// # Panics
    /// Panics if the cell is outside the padded grid.
    #[inline]
    pub fn set(&mut self, gx: usize, gy: usize, gz: usize, block: Option<Block>) {
        self.blocks[grid_index(gx, gy, gz)] = block;
    }

    /// The block at a local position, rim and cap rows included
    /// (`-1..=CHUNK_DIMENSION` horizontally, `-1..=CHUNK_HEIGHT` vertically).
    pub fn get_local(&self, local: Point3<i32>) -> Option<Block> {
        let (gx, gy, gz) = local_to_grid(local)?;
        self.get(gx, gy, gz)
    }

    /// Number of cells holding a block, rim included.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }
}

/// Converts a local position (which may address the rim or cap rows) to grid
/// indices, or `None` if it lies outside the padded grid.
#[inline]
pub fn local_to_grid(local: Point3<i32>) -> Option<(usize, usize, usize)> {
    let in_range = |v: i32, max: i32| (-1..=max).contains(&v);
    if in_range(local.x, CHUNK_DIMENSION)
        && in_range(local.y, CHUNK_HEIGHT)
        && in_range(local.z, CHUNK_DIMENSION)
    {
        Some((
            (local.x + 1) as usize,
            (local.y + 1) as usize,
            (local.z + 1) as usize,
        ))
    } else {
        None
    }
}
