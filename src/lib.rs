#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Streaming
//!
//! A voxel world engine without a window: deterministic terrain generation,
//! chunk streaming around a moving player, face-culled meshing, collision
//! shapes and block editing with persisted edits.
//!
//! ## Key Modules
//!
//! * `core` - Shared-state primitives used throughout the engine
//! * `engine_state` - The engine facade plus streaming, voxels, rendering data and task management
//!
//! ## Architecture
//!
//! The engine is split between:
//! * A main thread that owns the scene and applies every attach, detach and collision build
//! * A fixed worker pool that generates and meshes chunks
//! * Collaborators behind traits: the `Scene`, the `Inventory` and the `EditStore`
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(error) = voxel_streaming::run() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```

use cgmath::Point3;
use log::{info, warn};

pub mod core;
pub mod engine_state;

pub use engine_state::{
    config::EngineConfig,
    error::{ConfigError, EditError, EngineError},
    scene::{HeadlessScene, Scene},
    voxels::chunk::EditOutcome,
    EngineState, PlayerEvent,
};

/// Configuration file read by `run` when present in the working directory.
pub const CONFIG_FILE: &str = "voxel.json";

/// Number of chunk boundaries the demo player crosses in each direction.
const DEMO_WALK_CHUNKS: i32 = 4;

/// Runs a headless session: a simulated player walks across chunk boundaries,
/// mines a block and places it back, then the engine shuts down.
pub fn run() -> Result<(), EngineError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = if std::path::Path::new(CONFIG_FILE).exists() {
        info!("Loading configuration from {}", CONFIG_FILE);
        EngineConfig::from_json_file(CONFIG_FILE)?
    } else {
        info!("No {} found, using default configuration", CONFIG_FILE);
        EngineConfig::default()
    };

    let chunk_size = config.world.chunk_size as f32;
    let eye_height = config.world.terrain_height as f32;
    let mut engine = EngineState::new(config)?;
    let mut scene = HeadlessScene::new();

    let walk = (0..=DEMO_WALK_CHUNKS).chain((0..DEMO_WALK_CHUNKS).rev());
    for step in walk {
        let position = Point3::new(step as f32 * chunk_size + 0.5, eye_height, 0.5);
        engine.handle_event(PlayerEvent::Moved(position))?;
        engine.wait_until_idle();
        let report = engine.tick(&mut scene);

        info!(
            "Player at chunk {:?}: {} attached, {} detached, {} resident, {} cached",
            engine.chunk_manager.player_chunk(),
            report.attached,
            report.detached,
            engine.chunk_manager.resident_coordinates().len(),
            engine.chunk_manager.cached_coordinates().len()
        );
    }

    let top = (0..engine.config().world.terrain_height)
        .rev()
        .map(|y| Point3::new(0, y, 0))
        .find(|position| {
            engine
                .chunk_manager
                .block_at(*position)
                .is_some_and(|block| !block.is_air())
        });

    match top {
        Some(position) => {
            let mined = engine.chunk_manager.block_at(position);
            let outcome = engine.handle_event(PlayerEvent::Mine(position))?;
            info!("Mining {:?} at {:?}: {:?}", mined, position, outcome);

            if let (Some(block_type), Some(EditOutcome::Applied)) = (mined, outcome) {
                let outcome = engine.handle_event(PlayerEvent::Place(position, block_type))?;
                info!("Placing {:?} at {:?}: {:?}", block_type, position, outcome);
            }
            engine.tick(&mut scene);
        }
        None => warn!("No solid block under the origin to mine"),
    }

    info!(
        "Scene holds {} chunks with {} quads; {} attaches, {} detaches",
        scene.len(),
        scene.total_quads(),
        scene.attach_count(),
        scene.detach_count()
    );
    info!(
        "World generator computed {} volumes",
        engine.chunk_manager.generator().computed_volumes()
    );

    engine.shutdown();
    Ok(())
}
