//! # Voxel World
//!
//! Block data, chunk storage and the streaming machinery that keeps chunks resident
//! around the player.
//!
//! ## Architecture
//!
//! * **Block**: block types, faces and their atlas cells
//! * **Chunk**: a fixed-size column of blocks with its edits, mesh and collision
//! * **World generation**: deterministic, memoized terrain from layered noise
//! * **Chunk manager**: loads, caches and evicts chunks as the player moves
//! * **Persistence**: edit lists per chunk, replayed on regeneration
//! * **Tasks**: chunk generation work run on the task manager's workers
//!
//! ## Data Flow
//!
//! 1. The player enters a new chunk and the chunk manager recomputes the resident set
//! 2. Missing chunks are claimed and generated on workers, then meshed
//! 3. Finished chunks return to the chunk manager and wait for the next tick
//! 4. The tick finalizes collision and attaches them to the scene
//!
//! ## Thread Safety
//!
//! * Baseline volumes are immutable and shared through `Arc`
//! * The loaded map and generation memo allow atomic insert, remove and lookup
//! * Scene mutation only happens on the thread calling `ChunkManager::tick`

pub mod block;
pub mod chunk;
pub mod chunk_manager;
pub mod persistence;
pub mod tasks;
pub mod world_gen;
