//! # Chunk Manager
//!
//! Keeps the set of resident chunks matched to a radius around the player.
//!
//! ## Residency
//!
//! Every chunk coordinate is in exactly one of these places:
//!
//! - **loaded**: claimed in the loaded map, either still `Generating` on a worker or
//!   `Resident` with its data
//! - **cached**: evicted, kept whole in the retained cache, not in the scene
//! - **unloaded**: nowhere
//!
//! Streaming is recomputed only when the player enters a new chunk:
//!
//! 1. Loaded chunks farther than `generation_radius + hysteresis_margin` are
//!    evicted. Resident ones move to the cache and are queued for detach.
//! 2. Chunks within `generation_radius` that are not loaded are reattached from
//!    the cache when possible, and otherwise claimed and sent for generation.
//!
//! The gap between the load and eviction radii keeps chunks near the boundary from
//! being evicted and reloaded as the player walks back and forth across it.
//!
//! ## Claims
//!
//! A coordinate is claimed in the loaded map (first writer wins) when its
//! generation is dispatched, so it is never dispatched twice while in flight. A
//! completed chunk fills its claim; a result for a coordinate that is already
//! resident is a duplicate and is dropped, and a result whose claim was evicted in
//! the meantime goes straight to the cache unless the cache already holds that
//! coordinate, in which case it is dropped too.
//!
//! ## Scene Mutation
//!
//! Attach, detach and collision finalize happen only in [`ChunkManager::tick`], on
//! the thread that owns the scene. Everything else only queues work for it.

use std::collections::{HashMap, HashSet, VecDeque};
use std::num::NonZeroUsize;
use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::{debug, info};
use lru::LruCache;

use crate::core::{ConcurrentMap, MtResource};
use crate::engine_state::config::{EngineConfig, StreamingConfig};
use crate::engine_state::error::EditError;
use crate::engine_state::inventory::Inventory;
use crate::engine_state::rendering::{atlas::TextureAtlas, collision::TrimeshBuilder};
use crate::engine_state::scene::Scene;
use crate::engine_state::task_management::TaskManager;

use super::block::block_type::BlockType;
use super::chunk::coordinates::{
    chunk_at_position, chunk_distance, chunks_in_radius, split_world_position, ChunkCoordinate,
};
use super::chunk::{Chunk, EditOutcome};
use super::persistence::EditStore;
use super::tasks::chunk_generation_task::ChunkGenerationTask;
use super::world_gen::WorldGenerator;

/// Entry of the loaded map.
#[derive(Clone)]
pub enum ChunkSlot {
    /// Claimed; a worker is building the chunk.
    Generating,
    /// Built and owned by the manager.
    Resident(MtResource<Chunk>),
}

/// Counts from one streaming update.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingUpdate {
    pub evicted: usize,
    pub reattached: usize,
    pub dispatched: usize,
}

/// Counts from one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub attached: usize,
    pub detached: usize,
    pub updated: usize,
}

enum Completion {
    Claimed,
    Duplicate,
    Orphaned(MtResource<Chunk>),
}

/// Streams chunks in and out around the player.
pub struct ChunkManager {
    streaming: StreamingConfig,
    chunk_size: i32,
    terrain_height: i32,
    generator: Arc<WorldGenerator>,
    atlas: Arc<TextureAtlas>,
    edit_store: Arc<dyn EditStore>,
    trimesh_builder: TrimeshBuilder,
    loaded: ConcurrentMap<ChunkCoordinate, ChunkSlot>,
    cached: MtResource<LruCache<ChunkCoordinate, MtResource<Chunk>>>,
    generation_requests: HashMap<ChunkCoordinate, usize>,
    attached: HashSet<ChunkCoordinate>,
    pending_attach: VecDeque<ChunkCoordinate>,
    pending_detach: VecDeque<ChunkCoordinate>,
    pending_update: VecDeque<ChunkCoordinate>,
    player_chunk: Option<ChunkCoordinate>,
}

impl ChunkManager {
    /// Creates a manager over shared collaborators. `config` must be validated.
    pub fn new(
        config: &EngineConfig,
        generator: Arc<WorldGenerator>,
        atlas: Arc<TextureAtlas>,
        edit_store: Arc<dyn EditStore>,
    ) -> Self {
        let cache = match config.streaming.max_cached_chunks.and_then(NonZeroUsize::new) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };

        ChunkManager {
            streaming: config.streaming.clone(),
            chunk_size: config.world.chunk_size,
            terrain_height: config.world.terrain_height,
            generator,
            atlas,
            edit_store,
            trimesh_builder: TrimeshBuilder::new(),
            loaded: ConcurrentMap::new(),
            cached: MtResource::new(cache),
            generation_requests: HashMap::new(),
            attached: HashSet::new(),
            pending_attach: VecDeque::new(),
            pending_detach: VecDeque::new(),
            pending_update: VecDeque::new(),
            player_chunk: None,
        }
    }

    pub fn atlas(&self) -> &Arc<TextureAtlas> {
        &self.atlas
    }

    pub fn generator(&self) -> &Arc<WorldGenerator> {
        &self.generator
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Volume dimensions of every chunk, `(chunk_size, terrain_height, chunk_size)`.
    pub fn chunk_dimensions(&self) -> Vector3<usize> {
        let size = self.chunk_size as usize;
        Vector3::new(size, self.terrain_height as usize, size)
    }

    /// The chunk the player was last seen in.
    pub fn player_chunk(&self) -> Option<ChunkCoordinate> {
        self.player_chunk
    }

    /// Reacts to a player position. Streaming is only recomputed when the player
    /// enters a different chunk.
    ///
    /// # Returns
    /// The streaming counts if a recomputation happened.
    pub fn update_player_position(
        &mut self,
        position: Point3<f32>,
        task_manager: &mut TaskManager,
    ) -> Option<StreamingUpdate> {
        let chunk = chunk_at_position(position, self.chunk_size);
        if self.player_chunk == Some(chunk) {
            return None;
        }
        Some(self.update_streaming(chunk, task_manager))
    }

    /// Recomputes the resident set around `center`.
    pub fn update_streaming(
        &mut self,
        center: ChunkCoordinate,
        task_manager: &mut TaskManager,
    ) -> StreamingUpdate {
        self.player_chunk = Some(center);
        let mut update = StreamingUpdate::default();

        let eviction_radius = (self.streaming.generation_radius + self.streaming.hysteresis_margin) as f32;
        for coordinate in self.loaded.keys() {
            if chunk_distance(coordinate, center) <= eviction_radius {
                continue;
            }
            match self.loaded.remove(&coordinate) {
                Some(ChunkSlot::Resident(chunk)) => {
                    self.retain(coordinate, chunk);
                    self.pending_detach.push_back(coordinate);
                    update.evicted += 1;
                }
                Some(ChunkSlot::Generating) => {
                    debug!("Released claim on {:?} while it was generating", coordinate);
                    update.evicted += 1;
                }
                None => {}
            }
        }

        for coordinate in self.desired_chunks() {
            if self.loaded.contains_key(&coordinate) {
                continue;
            }

            let cached = self.cached.get_mut().pop(&coordinate);
            if let Some(chunk) = cached {
                self.loaded.insert(coordinate, ChunkSlot::Resident(chunk));
                self.pending_attach.push_back(coordinate);
                update.reattached += 1;
            } else if self.loaded.try_insert(coordinate, ChunkSlot::Generating).is_ok() {
                *self.generation_requests.entry(coordinate).or_insert(0) += 1;
                task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                    self.generator.clone(),
                    self.edit_store.clone(),
                    coordinate,
                    self.chunk_size,
                )));
                update.dispatched += 1;
            }
        }

        info!(
            "Streaming around {:?}: {} evicted, {} reattached, {} dispatched",
            center, update.evicted, update.reattached, update.dispatched
        );
        update
    }

    /// Hands a finished chunk back from the workers.
    pub fn complete_generation(&mut self, coordinate: ChunkCoordinate, chunk: MtResource<Chunk>) {
        let completion = self.loaded.update(&coordinate, move |slot| match slot {
            Some(ChunkSlot::Generating) => {
                *slot = Some(ChunkSlot::Resident(chunk));
                Completion::Claimed
            }
            Some(ChunkSlot::Resident(_)) => Completion::Duplicate,
            None => Completion::Orphaned(chunk),
        });

        match completion {
            Completion::Claimed => self.pending_attach.push_back(coordinate),
            Completion::Duplicate => {
                debug!("Discarding duplicate generation result for {:?}", coordinate);
            }
            Completion::Orphaned(chunk) => {
                if self.cached.get().contains(&coordinate) {
                    debug!("Discarding stale generation result for cached {:?}", coordinate);
                } else {
                    debug!("Chunk {:?} finished after eviction, caching it", coordinate);
                    self.retain(coordinate, chunk);
                }
            }
        }
    }

    /// Applies queued scene changes. Must be called from the scene's thread.
    pub fn tick(&mut self, scene: &mut dyn Scene) -> TickReport {
        let mut report = TickReport::default();

        while let Some(coordinate) = self.pending_detach.pop_front() {
            if self.resident_chunk(coordinate).is_some() {
                continue;
            }
            if self.attached.remove(&coordinate) {
                scene.detach(coordinate);
                report.detached += 1;
            }
        }

        while let Some(coordinate) = self.pending_attach.pop_front() {
            if self.attached.contains(&coordinate) {
                continue;
            }
            let Some(chunk) = self.resident_chunk(coordinate) else {
                continue;
            };
            let mut chunk = chunk.get_mut();
            if !chunk.is_finalized() {
                chunk.finalize(&self.atlas, &self.trimesh_builder);
            }
            scene.attach(&chunk);
            self.attached.insert(coordinate);
            report.attached += 1;
        }

        while let Some(coordinate) = self.pending_update.pop_front() {
            if !self.attached.contains(&coordinate) {
                continue;
            }
            if let Some(chunk) = self.resident_chunk(coordinate) {
                scene.update(&chunk.get());
                report.updated += 1;
            }
        }

        if report != TickReport::default() {
            debug!(
                "Tick: {} attached, {} detached, {} updated",
                report.attached, report.detached, report.updated
            );
        }
        report
    }

    /// Places a block at a world coordinate. Edits to chunks that are not resident
    /// are dropped.
    pub fn place_block(
        &mut self,
        world: Point3<i32>,
        block_type: BlockType,
        inventory: &mut dyn Inventory,
    ) -> Result<EditOutcome, EditError> {
        let (coordinate, local) = split_world_position(world, self.chunk_size);
        let Some(chunk) = self.resident_chunk(coordinate) else {
            debug!("Dropping placement at {:?}: chunk {:?} is not loaded", world, coordinate);
            return Ok(EditOutcome::Rejected);
        };

        let outcome = chunk.get_mut().place_block(
            local,
            block_type,
            inventory,
            &self.atlas,
            &self.trimesh_builder,
        )?;
        self.after_edit(coordinate, &chunk, outcome);
        Ok(outcome)
    }

    /// Mines the block at a world coordinate. Edits to chunks that are not
    /// resident are dropped.
    pub fn remove_block(
        &mut self,
        world: Point3<i32>,
        inventory: &mut dyn Inventory,
    ) -> Result<EditOutcome, EditError> {
        let (coordinate, local) = split_world_position(world, self.chunk_size);
        let Some(chunk) = self.resident_chunk(coordinate) else {
            debug!("Dropping removal at {:?}: chunk {:?} is not loaded", world, coordinate);
            return Ok(EditOutcome::Rejected);
        };

        let outcome =
            chunk
                .get_mut()
                .remove_block(local, inventory, &self.atlas, &self.trimesh_builder)?;
        self.after_edit(coordinate, &chunk, outcome);
        Ok(outcome)
    }

    /// Block at a world coordinate, if its chunk is resident.
    pub fn block_at(&self, world: Point3<i32>) -> Option<BlockType> {
        let (coordinate, local) = split_world_position(world, self.chunk_size);
        self.resident_chunk(coordinate)
            .map(|chunk| chunk.get().block_at(local))
    }

    /// Chunks that should be resident around the current player chunk, nearest first.
    pub fn desired_chunks(&self) -> Vec<ChunkCoordinate> {
        match self.player_chunk {
            Some(center) => chunks_in_radius(center, self.streaming.generation_radius),
            None => Vec::new(),
        }
    }

    /// The resident chunk at `coordinate`.
    pub fn chunk(&self, coordinate: ChunkCoordinate) -> Option<MtResource<Chunk>> {
        self.resident_chunk(coordinate)
    }

    /// Coordinates with a claim in the loaded map, sorted.
    pub fn loaded_coordinates(&self) -> Vec<ChunkCoordinate> {
        sorted(self.loaded.keys())
    }

    /// Coordinates whose chunk is built and resident, sorted.
    pub fn resident_coordinates(&self) -> Vec<ChunkCoordinate> {
        sorted(
            self.loaded
                .entries()
                .into_iter()
                .filter(|(_, slot)| matches!(slot, ChunkSlot::Resident(_)))
                .map(|(coordinate, _)| coordinate)
                .collect(),
        )
    }

    /// Coordinates in the retained cache, sorted.
    pub fn cached_coordinates(&self) -> Vec<ChunkCoordinate> {
        sorted(self.cached.get().iter().map(|(coordinate, _)| *coordinate).collect())
    }

    /// Coordinates currently attached to the scene, sorted.
    pub fn attached_coordinates(&self) -> Vec<ChunkCoordinate> {
        sorted(self.attached.iter().copied().collect())
    }

    pub fn is_loaded(&self, coordinate: ChunkCoordinate) -> bool {
        self.resident_chunk(coordinate).is_some()
    }

    pub fn is_generating(&self, coordinate: ChunkCoordinate) -> bool {
        matches!(self.loaded.get(&coordinate), Some(ChunkSlot::Generating))
    }

    pub fn is_cached(&self, coordinate: ChunkCoordinate) -> bool {
        self.cached.get().contains(&coordinate)
    }

    /// How many times generation was dispatched for `coordinate`.
    pub fn generation_requests(&self, coordinate: ChunkCoordinate) -> usize {
        self.generation_requests.get(&coordinate).copied().unwrap_or(0)
    }

    /// Total generation dispatches so far.
    pub fn total_generation_requests(&self) -> usize {
        self.generation_requests.values().sum()
    }

    /// True when the resident set equals the desired set and no scene change is
    /// pending.
    pub fn is_converged(&self) -> bool {
        let desired: HashSet<ChunkCoordinate> = self.desired_chunks().into_iter().collect();
        let resident: HashSet<ChunkCoordinate> = self.resident_coordinates().into_iter().collect();
        let in_flight = self.loaded.len() != resident.len();

        !in_flight
            && desired.is_subset(&resident)
            && self.pending_attach.is_empty()
            && self.pending_detach.is_empty()
            && self.pending_update.is_empty()
    }

    fn resident_chunk(&self, coordinate: ChunkCoordinate) -> Option<MtResource<Chunk>> {
        match self.loaded.get(&coordinate) {
            Some(ChunkSlot::Resident(chunk)) => Some(chunk),
            _ => None,
        }
    }

    fn retain(&mut self, coordinate: ChunkCoordinate, chunk: MtResource<Chunk>) {
        if let Some((discarded, _)) = self.cached.get_mut().push(coordinate, chunk) {
            if discarded != coordinate {
                info!("Retained cache full, discarding chunk {:?}", discarded);
            }
        }
    }

    fn after_edit(&mut self, coordinate: ChunkCoordinate, chunk: &MtResource<Chunk>, outcome: EditOutcome) {
        match outcome {
            EditOutcome::Applied => {
                self.edit_store.store(coordinate, chunk.get().edit_list());
                if !self.pending_update.contains(&coordinate) {
                    self.pending_update.push_back(coordinate);
                }
                debug!("Edit applied in chunk {:?}", coordinate);
            }
            EditOutcome::Rejected => debug!("Edit rejected in chunk {:?}", coordinate),
        }
    }
}

fn sorted(mut coordinates: Vec<ChunkCoordinate>) -> Vec<ChunkCoordinate> {
    coordinates.sort_by_key(|coordinate| (coordinate.x, coordinate.y));
    coordinates
}
