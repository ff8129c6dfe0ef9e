mod common;

use std::{sync::mpsc, thread, time::Duration};

use cgmath::Point2;
use voxel_world::engine_state::{
    rendering::meshing::generate_mesh,
    voxels::{chunk::chunk_iteration::ring_distance, world::ChunkState},
};

use common::{catalog, chunk_center, engine, settle, shallow_config};

#[test]
fn every_chunk_in_radius_is_built_and_shown() {
    let mut engine = engine(shallow_config(2, 2, 2));
    let report = engine.tick(chunk_center(0, 0));
    assert_eq!(report.requested, 25);

    settle(&mut engine, chunk_center(0, 0));

    let tracked = engine.world().tracked_positions();
    assert_eq!(tracked.len(), 25);
    for position in &tracked {
        assert!(ring_distance(*position, Point2::new(0, 0)) <= 2);
        assert_eq!(engine.world().chunk_state(*position), Some(ChunkState::Ready));
        let surface = engine.renderer().surface(*position).unwrap();
        assert_eq!(surface.uploads, 1);
        assert!(surface.active);
        assert!(surface.faces > 0);
    }
    assert_eq!(engine.renderer().active_count(), 25);
}

#[test]
fn worker_interleaving_does_not_change_the_world() {
    let mut single = engine(shallow_config(1, 1, 1));
    let mut pool = engine(shallow_config(1, 4, 3));
    settle(&mut single, chunk_center(-2, 3));
    settle(&mut pool, chunk_center(-2, 3));

    let catalog = catalog();
    let positions = single.world().tracked_positions();
    assert_eq!(positions, pool.world().tracked_positions());
    for position in positions {
        let a = single.world().chunk(position).unwrap();
        let b = pool.world().chunk(position).unwrap();
        assert_eq!(generate_mesh(a, &catalog), generate_mesh(b, &catalog));
        assert_eq!(
            single.renderer().surface(position),
            pool.renderer().surface(position)
        );
    }
}

#[test]
fn returning_observer_reuses_cached_chunks() {
    let mut engine = engine(shallow_config(1, 2, 4));
    settle(&mut engine, chunk_center(0, 0));

    let away = engine.tick(chunk_center(1, 0));
    assert_eq!(away.deactivated, 3);
    assert_eq!(away.requested, 3);
    settle(&mut engine, chunk_center(1, 0));
    assert!(!engine.renderer().surface(Point2::new(-1, 0)).unwrap().active);

    let back = engine.tick(chunk_center(0, 0));
    assert_eq!(back.requested, 0);
    assert_eq!(back.reactivated, 3);
    assert_eq!(back.regenerated, 0);
    let surface = engine.renderer().surface(Point2::new(-1, 0)).unwrap();
    assert!(surface.active);
    assert_eq!(surface.uploads, 1);
}

#[test]
fn shutdown_during_a_batch_returns() {
    let mut engine = engine(shallow_config(2, 1, 4));
    engine.tick(chunk_center(0, 0));
    thread::sleep(Duration::from_millis(5));

    let (done, finished) = mpsc::channel();
    thread::spawn(move || {
        engine.shutdown();
        done.send(()).unwrap();
    });
    finished
        .recv_timeout(Duration::from_secs(30))
        .expect("shutdown did not return");
}

#[test]
fn dropping_a_busy_engine_returns() {
    let (done, finished) = mpsc::channel();
    thread::spawn(move || {
        let mut engine = engine(shallow_config(2, 2, 4));
        engine.tick(chunk_center(0, 0));
        engine.tick(chunk_center(0, 0));
        drop(engine);
        done.send(()).unwrap();
    });
    finished
        .recv_timeout(Duration::from_secs(30))
        .expect("drop did not return");
}

#[test]
fn shutdown_is_idempotent() {
    let mut engine = engine(shallow_config(1, 3, 1));
    engine.tick(chunk_center(0, 0));
    engine.shutdown();
    engine.shutdown();
}
