//! # Chunk Meshing
//!
//! Face-culling mesher: every exposed face of every block inside the chunk is
//! emitted as one quad, everything else is skipped. Neighbours across the chunk
//! border are read from the grid's mirrored rim, so a chunk is meshed without
//! touching any other chunk. Work is proportional to the exposed surface, not
//! to the chunk volume.

pub mod mesh;

use cgmath::Vector3;

use self::mesh::MeshBuffers;
use crate::engine_state::voxels::{
    block::{block_side::BlockSide, catalog::BlockTypeCatalog},
    chunk::{Chunk, CHUNK_DIMENSION, CHUNK_HEIGHT},
};

/// Builds the mesh of a chunk.
///
/// Cells are visited z-outer, x, then y; faces of a block are emitted in
/// `BlockSide::all()` order. Both orders are fixed so the same grid always
/// yields the same buffers.
pub fn generate_mesh(chunk: &Chunk, catalog: &BlockTypeCatalog) -> MeshBuffers {
    let mut mesh = MeshBuffers::new();
    let sides = BlockSide::all();

    for z in 1..=CHUNK_DIMENSION as usize {
        for x in 1..=CHUNK_DIMENSION as usize {
            for y in 1..=CHUNK_HEIGHT as usize {
                let Some(block) = chunk.get(x, y, z) else {
                    continue;
                };

                let exposed = sides.map(|side| {
                    let n = side.normal();
                    !chunk.is_block_solid(
                        (x as i32 + n.x) as usize,
                        (y as i32 + n.y) as usize,
                        (z as i32 + n.z) as usize,
                    )
                });
                if !exposed.contains(&true) {
                    continue;
                }

                let offset = Vector3::new(
                    block.position.x as f32,
                    block.position.y as f32,
                    block.position.z as f32,
                );

                for (side, is_exposed) in sides.into_iter().zip(exposed) {
                    if is_exposed {
                        mesh.push_face(side, offset, catalog.face_uvs(block.block_type, side));
                    }
                }
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use cgmath::{Point2, Point3};

    use super::*;
    use crate::engine_state::{
        config::WorldConfig,
        voxels::{
            block::{block_type::BlockType, Block},
            chunk::local_to_grid,
            terrain::TerrainGenerator,
        },
    };

    fn catalog() -> BlockTypeCatalog {
        BlockTypeCatalog::atlas_grid(4, 4, |block_type, side| block_type.id() as u32 + side as u32)
            .unwrap()
    }

    fn place(chunk: &mut Chunk, x: i32, y: i32, z: i32, block_type: BlockType) {
        let (gx, gy, gz) = local_to_grid(Point3::new(x, y, z)).unwrap();
        let position = Point3::new(x as i16, y as i16, z as i16);
        chunk.set(gx, gy, gz, Some(Block::new(block_type, position)));
    }

    #[test]
    fn empty_chunk_has_no_faces() {
        let mesh = generate_mesh(&Chunk::empty(Point2::new(0, 0)), &catalog());
        assert!(mesh.is_empty());
        assert!(mesh.is_consistent());
    }

    #[test]
    fn lone_block_emits_six_faces_with_catalog_uvs() {
        let catalog = catalog();
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        place(&mut chunk, 4, 10, 7, BlockType::Grass);

        let mesh = generate_mesh(&chunk, &catalog);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.vertices[0], [4.0, 11.0, 8.0]);
        for (i, side) in BlockSide::all().into_iter().enumerate() {
            assert_eq!(
                &mesh.uvs[i * 4..i * 4 + 4],
                catalog.face_uvs(BlockType::Grass, side)
            );
        }
    }

    #[test]
    fn shared_faces_are_culled() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        place(&mut chunk, 4, 10, 7, BlockType::Stone);
        place(&mut chunk, 5, 10, 7, BlockType::Dirt);
        let mesh = generate_mesh(&chunk, &catalog());
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn enclosed_block_emits_nothing() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        for x in 3..6 {
            for y in 3..6 {
                for z in 3..6 {
                    place(&mut chunk, x, y, z, BlockType::Stone);
                }
            }
        }
        let mesh = generate_mesh(&chunk, &catalog());
        assert_eq!(mesh.face_count(), 9 * 6);
    }

    #[test]
    fn rim_neighbour_hides_the_boundary_face() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        place(&mut chunk, 0, 20, 5, BlockType::Stone);
        assert_eq!(generate_mesh(&chunk, &catalog()).face_count(), 6);

        place(&mut chunk, -1, 20, 5, BlockType::Stone);
        let mesh = generate_mesh(&chunk, &catalog());
        assert_eq!(mesh.face_count(), 5);
        // Rim cells are never meshed themselves.
        assert!(mesh.vertices.iter().all(|v| v[0] >= 0.0));
    }

    #[test]
    fn generated_chunk_faces_match_exposed_neighbours() {
        let terrain = TerrainGenerator::new(&WorldConfig {
            seed: 5,
            ..Default::default()
        });
        let chunk = Chunk::generate(Point2::new(2, -1), &terrain);
        let mesh = generate_mesh(&chunk, &catalog());

        let mut expected = 0;
        for z in 1..=CHUNK_DIMENSION as usize {
            for x in 1..=CHUNK_DIMENSION as usize {
                for y in 1..=CHUNK_HEIGHT as usize {
                    if !chunk.is_block_solid(x, y, z) {
                        continue;
                    }
                    for side in BlockSide::all() {
                        let n = side.normal();
                        let (nx, ny, nz) = (
                            (x as i32 + n.x) as usize,
                            (y as i32 + n.y) as usize,
                            (z as i32 + n.z) as usize,
                        );
                        if !chunk.is_block_solid(nx, ny, nz) {
                            expected += 1;
                        }
                    }
                }
            }
        }

        assert!(expected > 0);
        assert_eq!(mesh.face_count(), expected);
        assert!(mesh.is_consistent());
        assert_eq!(mesh, generate_mesh(&chunk, &catalog()));
    }
}
