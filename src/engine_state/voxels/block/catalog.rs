//! # Block Catalog Module
//!
//! Maps every block type to six pre-resolved UV rectangles, one per cube face.
//! The catalog is built once before generation starts and shared read-only by
//! every worker; building it fails if any block type is missing, so the mesher
//! can look faces up without a fallible path.

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use super::{
    block_side::BlockSide,
    block_type::{BlockType, BLOCK_TYPE_COUNT},
};
use crate::engine_state::error::{EngineError, Result};

/// The four UV corners of one face, in the same order as the face's vertices:
/// upper-left, upper-right, lower-left, lower-right.
pub type FaceUvs = [[f32; 2]; 4];

/// An axis-aligned rectangle of the texture atlas in normalized coordinates.
///
/// Serialized as `[u_min, v_min, u_max, v_max]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct UvRect {
    /// Lower-left corner
    pub min: [f32; 2],
    /// Upper-right corner
    pub max: [f32; 2],
}

impl UvRect {
    /// Creates a rectangle from its two corners.
    pub fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        UvRect { min, max }
    }

    /// Expands the rectangle into four per-vertex UVs.
    pub fn corners(&self) -> FaceUvs {
        [
            [self.min[0], self.max[1]],
            [self.max[0], self.max[1]],
            [self.min[0], self.min[1]],
            [self.max[0], self.min[1]],
        ]
    }
}

impl From<[f32; 4]> for UvRect {
    fn from(value: [f32; 4]) -> Self {
        UvRect::new([value[0], value[1]], [value[2], value[3]])
    }
}

impl From<UvRect> for [f32; 4] {
    fn from(value: UvRect) -> Self {
        [value.min[0], value.min[1], value.max[0], value.max[1]]
    }
}

/// Per-face UVs of a single block type, indexed by `BlockSide as usize`.
pub type BlockFaces = [FaceUvs; 6];

/// Read-only table from block type to its six face UVs.
#[derive(Clone, Debug)]
pub struct BlockTypeCatalog {
    faces: [BlockFaces; BLOCK_TYPE_COUNT],
}

impl BlockTypeCatalog {
    /// Builds a catalog from explicit entries.
    ///
    /// # Arguments
    /// * `entries` - Face rectangles for each block type, in `BlockSide::all()` order
    ///
    /// # Returns
    /// `EngineError::UnregisteredBlockType` naming the first block type that has
    /// no entry. Later entries for the same type replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = (BlockType, [UvRect; 6])>) -> Result<Self> {
        let mut slots: [Option<BlockFaces>; BLOCK_TYPE_COUNT] = [None; BLOCK_TYPE_COUNT];
        for (block_type, rects) in entries {
            slots[block_type as usize] = Some(rects.map(|rect| rect.corners()));
        }

        let mut faces = [[[[0.0; 2]; 4]; 6]; BLOCK_TYPE_COUNT];
        for block_type in BlockType::all() {
            faces[block_type as usize] = slots[block_type as usize]
                .ok_or(EngineError::UnregisteredBlockType(block_type))?;
        }

        Ok(BlockTypeCatalog { faces })
    }

    /// Builds a catalog for a regular `columns` x `rows` texture atlas.
    ///
    /// `tile_for` picks the tile index (row-major, row 0 at the top of the
    /// image) for each face of each block type.
    pub fn atlas_grid(
        columns: u32,
        rows: u32,
        tile_for: impl Fn(BlockType, BlockSide) -> u32,
    ) -> Result<Self> {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let tile_w = 1.0 / columns as f32;
        let tile_h = 1.0 / rows as f32;

        Self::new(BlockType::all().into_iter().map(|block_type| {
            let rects = BlockSide::all().map(|side| {
                let tile = tile_for(block_type, side);
                let column = (tile % columns) as f32;
                let row = (tile / columns % rows) as f32;
                // Texture v runs bottom to top
                let v_max = 1.0 - row * tile_h;
                UvRect::new([column * tile_w, v_max - tile_h], [(column + 1.0) * tile_w, v_max])
            });
            (block_type, rects)
        }))
    }

    /// Parses a JSON document keyed by block type name, then by face name.
    ///
    /// ```json
    /// { "Grass": { "top": [0.0, 0.75, 0.25, 1.0], "bottom": [...], ... } }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<BlockType, HashMap<BlockSide, UvRect>> = serde_json::from_str(json)?;

        let mut entries = Vec::with_capacity(raw.len());
        for (block_type, sides) in raw {
            let mut rects = [UvRect::new([0.0; 2], [0.0; 2]); 6];
            for side in BlockSide::all() {
                rects[side as usize] = *sides
                    .get(&side)
                    .ok_or(EngineError::UnregisteredBlockType(block_type))?;
            }
            entries.push((block_type, rects));
        }

        Self::new(entries)
    }

    /// Reads and parses a JSON catalog file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The four UVs for one face of a block type.
    #[inline]
    pub fn face_uvs(&self, block_type: BlockType, side: BlockSide) -> &FaceUvs {
        &self.faces[block_type as usize][side as usize]
    }

    /// Number of registered block types.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Always `false`; a catalog cannot be built without every type.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
