//! Flat mesh buffers handed from the mesher to a renderer.

use cgmath::Vector3;

use super::face::Face;
use crate::engine_state::voxels::block::{block_side::BlockSide, catalog::FaceUvs};

/// Vertex, index and UV buffers of one chunk.
///
/// Indices come in groups of six (two triangles per quad), every index is
/// below `vertices.len()`, and `uvs` is aligned one-to-one with `vertices`.
/// A `MeshBuffers` is only published once fully built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions in chunk-local space
    pub vertices: Vec<[f32; 3]>,
    /// Triangle list, six indices per face
    pub triangles: Vec<u32>,
    /// Texture coordinates, one per vertex
    pub uvs: Vec<[f32; 2]>,
    /// Index the next appended face starts at
    next_index: u32,
}

impl MeshBuffers {
    /// Creates empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one quad face.
    ///
    /// # Arguments
    /// * `side` - Which face of the unit cube to emit
    /// * `offset` - Translation of the cube, the block's local position
    /// * `uvs` - The four UVs for this face from the catalog
    pub fn push_face(&mut self, side: BlockSide, offset: Vector3<f32>, uvs: &FaceUvs) {
        self.vertices
            .extend_from_slice(&Face::new(side).offset_vertices(offset));
        self.triangles
            .extend_from_slice(&Face::triangles(self.next_index));
        self.uvs.extend_from_slice(uvs);
        self.next_index += 4;
    }

    /// Number of quad faces in the buffers.
    pub fn face_count(&self) -> usize {
        self.triangles.len() / 6
    }

    /// Whether no face was emitted.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Checks the buffer invariants.
    pub fn is_consistent(&self) -> bool {
        let vertex_count = self.vertices.len();
        self.triangles.len() % 6 == 0
            && self.vertices.len() == self.uvs.len()
            && self.next_index as usize == vertex_count
            && self.triangles.iter().all(|&i| (i as usize) < vertex_count)
    }

    /// Vertex positions as raw bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Indices as raw bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// UVs as raw bytes for GPU upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UVS: FaceUvs = [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

    #[test]
    fn repeated_faces_keep_indices_consistent() {
        let mut mesh = MeshBuffers::new();
        mesh.push_face(BlockSide::TOP, Vector3::new(0.0, 0.0, 0.0), &UVS);
        mesh.push_face(BlockSide::LEFT, Vector3::new(1.0, 2.0, 3.0), &UVS);

        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.triangles[6..], [4, 5, 6, 6, 5, 7]);
        assert!(mesh.is_consistent());
    }

    #[test]
    fn byte_views_cover_every_element() {
        let mut mesh = MeshBuffers::new();
        mesh.push_face(BlockSide::FRONT, Vector3::new(0.0, 0.0, 0.0), &UVS);
        assert_eq!(mesh.vertex_bytes().len(), 4 * 12);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
        assert_eq!(mesh.uv_bytes().len(), 4 * 8);
    }
}
