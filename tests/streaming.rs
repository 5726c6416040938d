use cgmath::{Point2, Point3};
use voxel_streaming::engine_state::voxels::chunk::coordinates::{chunk_distance, chunks_in_radius};
use voxel_streaming::{EngineConfig, EngineState, HeadlessScene, PlayerEvent};

fn streaming_config(radius: i32, margin: i32) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.world.chunk_size = 16;
    config.world.terrain_height = 64;
    config.world.sea_level = 24;
    config.streaming.generation_radius = radius;
    config.streaming.hysteresis_margin = margin;
    config.streaming.worker_threads = Some(4);
    config
}

fn move_to_chunk(engine: &mut EngineState, scene: &mut HeadlessScene, x: i32, z: i32) {
    let size = engine.config().world.chunk_size as f32;
    let position = Point3::new(x as f32 * size + size / 2.0, 60.0, z as f32 * size + size / 2.0);
    engine.handle_event(PlayerEvent::Moved(position)).unwrap();
    engine.wait_until_idle();
    engine.tick(scene);
}

#[test]
fn one_chunk_step_keeps_band_and_loads_new_edge() {
    let mut engine = EngineState::new(streaming_config(5, 2)).unwrap();
    let mut scene = HeadlessScene::new();

    move_to_chunk(&mut engine, &mut scene, 0, 0);
    let before = chunks_in_radius(Point2::new(0, 0), 5);
    assert!(engine.chunk_manager.is_converged());
    assert_eq!(engine.chunk_manager.resident_coordinates().len(), before.len());

    move_to_chunk(&mut engine, &mut scene, 1, 0);
    let update = engine.last_streaming_update().unwrap();
    let after = chunks_in_radius(Point2::new(1, 0), 5);

    // Everything loaded around (0, 0) is within radius + margin of (1, 0).
    assert_eq!(update.evicted, 0);
    assert!(engine.chunk_manager.cached_coordinates().is_empty());

    let entering: Vec<_> = after.iter().filter(|chunk| !before.contains(chunk)).collect();
    assert_eq!(update.dispatched, entering.len());
    for chunk in &after {
        assert!(engine.chunk_manager.is_loaded(*chunk));
        assert_eq!(engine.chunk_manager.generation_requests(*chunk), 1);
    }
    assert!(engine.chunk_manager.is_converged());
    engine.shutdown();
}

#[test]
fn chunks_leaving_the_band_are_cached_and_reattached_without_regeneration() {
    let mut engine = EngineState::new(streaming_config(5, 2)).unwrap();
    let mut scene = HeadlessScene::new();

    move_to_chunk(&mut engine, &mut scene, 0, 0);
    move_to_chunk(&mut engine, &mut scene, 8, 0);

    let cached = engine.chunk_manager.cached_coordinates();
    assert!(!cached.is_empty());
    for chunk in &cached {
        assert!(chunk_distance(*chunk, Point2::new(8, 0)) > 7.0);
        assert!(!scene.contains(*chunk));
        assert!(!engine.chunk_manager.is_loaded(*chunk));
    }
    for chunk in engine.chunk_manager.loaded_coordinates() {
        assert!(chunk_distance(chunk, Point2::new(8, 0)) <= 7.0);
        assert!(!engine.chunk_manager.is_cached(chunk));
    }

    let requests_before = engine.chunk_manager.total_generation_requests();
    move_to_chunk(&mut engine, &mut scene, 0, 0);
    let update = engine.last_streaming_update().unwrap();

    assert_eq!(update.reattached, cached.len());
    assert_eq!(update.dispatched, 0);
    assert_eq!(engine.chunk_manager.total_generation_requests(), requests_before);
    for chunk in &cached {
        assert_eq!(engine.chunk_manager.generation_requests(*chunk), 1);
        assert!(scene.contains(*chunk));
    }
    engine.shutdown();
}

#[test]
fn oscillating_across_a_boundary_does_not_churn() {
    let mut engine = EngineState::new(streaming_config(3, 2)).unwrap();
    let mut scene = HeadlessScene::new();

    move_to_chunk(&mut engine, &mut scene, 0, 0);
    move_to_chunk(&mut engine, &mut scene, 1, 0);
    let detaches = scene.detach_count();
    let requests = engine.chunk_manager.total_generation_requests();

    for _ in 0..5 {
        move_to_chunk(&mut engine, &mut scene, 0, 0);
        move_to_chunk(&mut engine, &mut scene, 1, 0);
    }

    assert_eq!(scene.detach_count(), detaches);
    assert_eq!(engine.chunk_manager.total_generation_requests(), requests);
    engine.shutdown();
}

#[test]
fn scene_matches_resident_set_after_every_settled_move() {
    let mut engine = EngineState::new(streaming_config(2, 1)).unwrap();
    let mut scene = HeadlessScene::new();
    let mut rng = fastrand::Rng::with_seed(7);
    let (mut x, mut z) = (0, 0);

    for _ in 0..12 {
        x += rng.i32(-3..=3);
        z += rng.i32(-3..=3);
        move_to_chunk(&mut engine, &mut scene, x, z);

        assert!(engine.chunk_manager.is_converged());
        assert_eq!(scene.coordinates(), engine.chunk_manager.resident_coordinates());
        assert_eq!(
            engine.chunk_manager.attached_coordinates(),
            engine.chunk_manager.resident_coordinates()
        );
        for chunk in engine.chunk_manager.cached_coordinates() {
            assert!(!engine.chunk_manager.loaded_coordinates().contains(&chunk));
        }
    }
    for chunk in engine.chunk_manager.loaded_coordinates() {
        assert_eq!(engine.chunk_manager.generation_requests(chunk), 1);
    }
    engine.shutdown();
}

#[test]
fn polling_without_blocking_converges() {
    let mut engine = EngineState::new(streaming_config(2, 1)).unwrap();
    let mut scene = HeadlessScene::new();

    engine
        .handle_event(PlayerEvent::Moved(Point3::new(-3.0, 60.0, -40.0)))
        .unwrap();
    assert_eq!(engine.chunk_manager.player_chunk(), Some(Point2::new(-1, -3)));

    while !engine.chunk_manager.is_converged() {
        engine.process_tasks();
        engine.tick(&mut scene);
        std::thread::yield_now();
    }

    assert_eq!(scene.len(), chunks_in_radius(Point2::new(-1, -3), 2).len());
    engine.shutdown();
}
