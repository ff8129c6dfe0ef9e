mod common;

use cgmath::{Point2, Point3, Vector3};
use voxel_world::engine_state::{
    error::EngineError,
    voxels::{block::block_type::BlockType, world::RaycastHit},
};

use common::{chunk_center, engine, settle, shallow_config};

#[test]
fn border_edit_remeshes_owner_and_neighbour_only() {
    let mut engine = engine(shallow_config(1, 2, 2));
    settle(&mut engine, chunk_center(0, 0));

    engine
        .set_block(Point3::new(0, 180, 7), Some(BlockType::GoldOre))
        .unwrap();
    assert_eq!(
        engine.world().pending_regenerations(),
        vec![Point2::new(-1, 0), Point2::new(0, 0)]
    );

    let report = engine.tick(chunk_center(0, 0));
    assert_eq!(report.regenerated, 2);
    settle(&mut engine, chunk_center(0, 0));

    for position in engine.world().tracked_positions() {
        let uploads = engine.renderer().surface(position).unwrap().uploads;
        let edited = position == Point2::new(0, 0) || position == Point2::new(-1, 0);
        assert_eq!(uploads, if edited { 2 } else { 1 }, "{:?}", position);
    }

    assert_eq!(
        engine.world().block_at(Point3::new(0, 180, 7)).unwrap(),
        Some(BlockType::GoldOre)
    );
}

#[test]
fn edits_racing_a_remesh_are_not_lost() {
    let mut engine = engine(shallow_config(0, 1, 1));
    settle(&mut engine, chunk_center(0, 0));

    engine
        .set_block(Point3::new(3, 200, 3), Some(BlockType::Stone))
        .unwrap();
    engine.tick(chunk_center(0, 0));
    engine
        .set_block(Point3::new(4, 200, 3), Some(BlockType::Dirt))
        .unwrap();
    settle(&mut engine, chunk_center(0, 0));

    assert_eq!(
        engine.world().block_at(Point3::new(3, 200, 3)).unwrap(),
        Some(BlockType::Stone)
    );
    assert_eq!(
        engine.world().block_at(Point3::new(4, 200, 3)).unwrap(),
        Some(BlockType::Dirt)
    );
    assert!(engine.renderer().surface(Point2::new(0, 0)).unwrap().uploads >= 2);
}

#[test]
fn targeted_edits_use_the_hit_face() {
    let mut engine = engine(shallow_config(0, 1, 2));
    settle(&mut engine, chunk_center(0, 0));

    let floating = Point3::new(9, 220, 9);
    engine.set_block(floating, Some(BlockType::Bedrock)).unwrap();
    let east_face = RaycastHit {
        point: Point3::new(10.0, 220.5, 9.5),
        normal: Vector3::new(1.0, 0.0, 0.0),
    };

    assert_eq!(
        engine.place_targeted(Some(east_face), BlockType::IronOre).unwrap(),
        Some(Point3::new(10, 220, 9))
    );
    assert_eq!(
        engine.break_targeted(Some(east_face)).unwrap(),
        Some(floating)
    );
    assert_eq!(engine.world().block_at(floating).unwrap(), None);
    assert_eq!(engine.place_targeted(None, BlockType::Stone).unwrap(), None);
    settle(&mut engine, chunk_center(0, 0));
}

#[test]
fn edits_outside_loaded_chunks_fail() {
    let mut engine = engine(shallow_config(0, 1, 1));
    settle(&mut engine, chunk_center(0, 0));

    assert!(matches!(
        engine.remove_block(Point3::new(-40, 100, 0)),
        Err(EngineError::ChunkNotLoaded(_))
    ));
    assert!(matches!(
        engine.set_block(Point3::new(1, -1, 1), Some(BlockType::Stone)),
        Err(EngineError::OutOfBounds { y: -1 })
    ));
}
