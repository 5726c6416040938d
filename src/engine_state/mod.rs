//! # Engine State Module
//!
//! The core engine module that manages the state and functionality of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `config` - Engine configuration and its validation
//! * `inventory` - The player's block inventory
//! * `rendering` - Atlas, meshing and collision data for a renderer collaborator
//! * `scene` - The receiver of attached and detached chunks
//! * `task_management` - Manages asynchronous tasks and worker threads
//! * `voxels` - Handles voxel data, chunks, streaming and world generation
//!
//! ## Architecture
//!
//! `EngineState` owns the task manager, the chunk manager and the inventory, and
//! turns player events into streaming updates and block edits. The caller drives
//! it from one thread:
//!
//! ```no_run
//! use voxel_streaming::{EngineConfig, EngineState, HeadlessScene, PlayerEvent};
//! use cgmath::Point3;
//!
//! let mut engine = EngineState::new(EngineConfig::default()).unwrap();
//! let mut scene = HeadlessScene::new();
//!
//! engine.handle_event(PlayerEvent::Moved(Point3::new(0.0, 80.0, 0.0))).unwrap();
//! loop {
//!     engine.process_tasks();
//!     engine.tick(&mut scene);
//!     # break;
//! }
//! engine.shutdown();
//! ```

use std::sync::Arc;

use cgmath::Point3;
use log::info;

use config::EngineConfig;
use error::{ConfigError, EditError};
use inventory::HotbarInventory;
use rendering::atlas::TextureAtlas;
use scene::Scene;
use task_management::TaskManager;
use voxels::{
    block::block_type::BlockType,
    chunk::EditOutcome,
    chunk_manager::{ChunkManager, StreamingUpdate, TickReport},
    persistence::{EditStore, MemoryEditStore},
    world_gen::WorldGenerator,
};

pub mod config;
pub mod error;
pub mod inventory;
pub mod rendering;
pub mod scene;
pub mod task_management;
pub mod voxels;

/// Something the player did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    /// The player moved to a world position.
    Moved(Point3<f32>),
    /// The player mined the block at a world coordinate.
    Mine(Point3<i32>),
    /// The player placed a block at a world coordinate.
    Place(Point3<i32>, BlockType),
}

/// The main state container for the voxel engine
///
/// Not `Sync`: every method must be called from the thread that owns the scene.
pub struct EngineState {
    config: EngineConfig,
    /// Task manager for asynchronous operations
    pub task_manager: TaskManager,
    /// Streams chunks around the player
    pub chunk_manager: ChunkManager,
    /// Blocks the player carries
    pub inventory: HotbarInventory,
    edit_store: Arc<dyn EditStore>,
    last_streaming_update: Option<StreamingUpdate>,
}

impl EngineState {
    /// Creates an engine whose edits live in memory.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_edit_store(config, Arc::new(MemoryEditStore::new()))
    }

    /// Creates an engine that loads and stores chunk edits through `edit_store`.
    ///
    /// # Returns
    /// The engine, or the first configuration problem found.
    pub fn with_edit_store(
        config: EngineConfig,
        edit_store: Arc<dyn EditStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let atlas = Arc::new(TextureAtlas::default_layout(
            config.atlas.columns,
            config.atlas.rows,
        )?);
        let generator = Arc::new(WorldGenerator::new(&config)?);
        let task_manager = TaskManager::new(config.streaming.worker_count());
        let chunk_manager = ChunkManager::new(&config, generator, atlas, edit_store.clone());

        info!(
            "Engine ready: chunk size {}, radius {}, margin {}",
            config.world.chunk_size,
            config.streaming.generation_radius,
            config.streaming.hysteresis_margin
        );

        Ok(Self {
            config,
            task_manager,
            chunk_manager,
            inventory: HotbarInventory::new(),
            edit_store,
            last_streaming_update: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn edit_store(&self) -> &Arc<dyn EditStore> {
        &self.edit_store
    }

    /// Counts from the most recent streaming recomputation.
    pub fn last_streaming_update(&self) -> Option<StreamingUpdate> {
        self.last_streaming_update
    }

    /// Applies a player event.
    ///
    /// # Returns
    /// `None` for movement, the edit outcome for mining and placing.
    pub fn handle_event(&mut self, event: PlayerEvent) -> Result<Option<EditOutcome>, EditError> {
        match event {
            PlayerEvent::Moved(position) => {
                if let Some(update) = self
                    .chunk_manager
                    .update_player_position(position, &mut self.task_manager)
                {
                    self.last_streaming_update = Some(update);
                }
                Ok(None)
            }
            PlayerEvent::Mine(world) => self
                .chunk_manager
                .remove_block(world, &mut self.inventory)
                .map(Some),
            PlayerEvent::Place(world, block_type) => self
                .chunk_manager
                .place_block(world, block_type, &mut self.inventory)
                .map(Some),
        }
    }

    /// Processes completed and queued tasks
    ///
    /// Call once per frame. Never blocks.
    pub fn process_tasks(&mut self) {
        self.task_manager
            .process_completed_tasks(&mut self.chunk_manager);
        self.task_manager.process_queued_tasks();
    }

    /// Applies pending attach, detach and update work to `scene`.
    pub fn tick(&mut self, scene: &mut dyn Scene) -> TickReport {
        self.chunk_manager.tick(scene)
    }

    /// Blocks until every dispatched task has finished and been applied.
    pub fn wait_until_idle(&mut self) {
        self.task_manager.wait_until_idle(&mut self.chunk_manager);
    }

    /// Drains in-flight work and stops the workers.
    pub fn shutdown(mut self) -> ChunkManager {
        self.task_manager.shutdown(&mut self.chunk_manager);
        info!(
            "Engine stopped after {} generation requests",
            self.chunk_manager.total_generation_requests()
        );
        self.chunk_manager
    }
}
