//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system.
//!
//! ## Core Components
//! - `Task`: A unit of work executed on a worker thread
//! - `TaskResult`: The outcome of a task, applied on the main thread
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the main thread with the chunk manager
//! 5. The result can hand back follow-up tasks (generation → meshing)
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `TaskResult` must be `Send` to be transferred back to the main thread
//! - Tasks own everything they read; shared inputs are `Arc`s of immutable data or
//!   thread-safe handles

use crate::engine_state::voxels::chunk_manager::ChunkManager;

/// A unit of work that runs on a worker thread.
///
/// Tasks should own all the data they need. They must not touch scene state; any
/// effect on the world is expressed through the returned result.
pub trait Task: Send {
    /// Performs the work and returns a result for the main thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`, applied on the main thread.
pub trait TaskResult: Send {
    /// Applies the result to the chunk manager.
    ///
    /// # Returns
    /// Follow-up tasks to schedule (possibly empty).
    fn handle_result(self: Box<Self>, chunk_manager: &mut ChunkManager) -> Vec<Box<dyn Task + Send>>;
}
