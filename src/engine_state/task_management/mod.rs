//! # Task Management System
//!
//! A fixed pool of worker threads for chunk generation and meshing.
//!
//! ## Architecture Overview
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work executed on a worker
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the main thread and one worker
//!
//! Each worker owns a dedicated task channel and result channel and accepts at most
//! `MAX_TASKS_IN_FLIGHT` tasks at a time, so the pool as a whole never runs more
//! than `workers * MAX_TASKS_IN_FLIGHT` tasks. Anything published beyond that
//! waits in a FIFO queue until a worker frees up.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands them to free workers round-robin, or queues them
//! 3. Workers process tasks and send results back
//! 4. Results are applied on the main thread in `process_completed_tasks()`, which
//!    never blocks
//! 5. Results can spawn new tasks, which go through the same path
//!
//! Dispatched tasks are never cancelled. `shutdown()` waits for every queued and
//! in-flight task, applies the results, and joins the workers.
//!
//! ## Example Usage
//! ```no_run
//! # use voxel_streaming::engine_state::{task_management::TaskManager, voxels::chunk_manager::ChunkManager};
//! # fn frame(task_manager: &mut TaskManager, chunk_manager: &mut ChunkManager) {
//! // In the main loop:
//! task_manager.process_completed_tasks(chunk_manager);
//! task_manager.process_queued_tasks();
//! # }
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use task::{Task, TaskResult};

use super::voxels::chunk_manager::ChunkManager;

/// A communication channel between the main thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from main thread to worker
/// - `result_receiver`: Receives task results from worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `worker`: Handle to the worker thread, joined on shutdown
/// - `disconnected`: Set once the worker is gone; the channel is never used again
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
    disconnected: bool,
}

impl TaskChannel {
    fn is_available(&self) -> bool {
        !self.disconnected && self.num_tasks_in_flight < MAX_TASKS_IN_FLIGHT
    }
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting and applying task results
/// - Queuing tasks when all workers are busy
///
/// It lives on the main thread; only tasks and results cross threads.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Panics
    /// Panics if the operating system refuses to spawn a thread.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "Spawning {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("chunk-worker-{worker_index}"))
                .spawn(task_closure)
                .unwrap_or_else(|error| panic!("failed to spawn task worker: {error}"));

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker: Some(worker),
                disconnected: false,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks currently running on workers.
    pub fn in_flight_count(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// True when nothing is queued and nothing is running.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.in_flight_count() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was handed to the worker
    /// - `Err(task)` if the worker is gone, returning the task for requeueing
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        let channel = &mut self.channels[channel_idx];
        match channel.task_sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(error) => {
                warn!("Task worker {} disconnected", channel_idx);
                channel.disconnected = true;
                Err(error.0)
            }
        }
    }

    /// Finds a worker channel that can accept a new task, round-robin from the
    /// last used channel.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|step| (self.current_channel + step) % count)
            .find(|&index| self.channels[index].is_available())
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately handed to a worker
    /// - `false` if it was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        let Some(channel_idx) = self.find_available_channel() else {
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(_) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                true
            }
            Err(task) => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to free workers, oldest first, until either the queue
    /// is empty or every worker is busy.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };

            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => self.queued_tasks.push_front(task),
            }
        }
    }

    /// Applies every result that is already waiting, without blocking.
    ///
    /// Follow-up tasks returned by the results are published afterwards.
    ///
    /// # Returns
    /// The number of results applied.
    pub fn process_completed_tasks(&mut self, chunk_manager: &mut ChunkManager) -> usize {
        let mut results = Vec::new();
        for channel in &mut self.channels {
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        results.push(result);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if !channel.disconnected {
                            warn!("Task worker stopped with {} tasks in flight", channel.num_tasks_in_flight);
                        }
                        channel.disconnected = true;
                        channel.num_tasks_in_flight = 0;
                        break;
                    }
                }
            }
        }

        self.apply_results(results, chunk_manager)
    }

    /// Blocks until every queued and in-flight task has finished and its result
    /// has been applied, including follow-up tasks.
    pub fn wait_until_idle(&mut self, chunk_manager: &mut ChunkManager) {
        while !self.is_idle() {
            self.process_queued_tasks();

            if self.channels.iter().all(|channel| channel.disconnected) {
                warn!(
                    "Dropping {} queued tasks: no task workers left",
                    self.queued_tasks.len()
                );
                self.queued_tasks.clear();
                break;
            }

            let mut results = Vec::new();
            for channel in &mut self.channels {
                if channel.num_tasks_in_flight == 0 {
                    continue;
                }
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        results.push(result);
                    }
                    Err(_) => {
                        warn!("Task worker stopped with {} tasks in flight", channel.num_tasks_in_flight);
                        channel.disconnected = true;
                        channel.num_tasks_in_flight = 0;
                    }
                }
            }

            self.apply_results(results, chunk_manager);
        }
    }

    /// Drains all outstanding work into the chunk manager, then stops and joins
    /// every worker.
    pub fn shutdown(&mut self, chunk_manager: &mut ChunkManager) {
        self.wait_until_idle(chunk_manager);

        for channel in self.channels.drain(..) {
            let TaskChannel {
                task_sender,
                worker,
                ..
            } = channel;
            drop(task_sender);
            if let Some(worker) = worker {
                if worker.join().is_err() {
                    warn!("Task worker panicked");
                }
            }
        }
        debug!("Task workers joined");
    }

    fn apply_results(
        &mut self,
        results: Vec<Box<dyn TaskResult + Send>>,
        chunk_manager: &mut ChunkManager,
    ) -> usize {
        let count = results.len();
        let mut tasks_to_queue = Vec::new();
        for result in results {
            tasks_to_queue.extend(result.handle_result(chunk_manager));
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::engine_state::{
        config::EngineConfig, rendering::atlas::TextureAtlas,
        voxels::persistence::MemoryEditStore, voxels::world_gen::WorldGenerator,
    };

    /// Counts down, spawning one follow-up task per step.
    struct CountdownTask {
        remaining: usize,
        processed: Arc<AtomicUsize>,
    }

    struct CountdownResult {
        remaining: usize,
        processed: Arc<AtomicUsize>,
    }

    impl Task for CountdownTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            self.processed.fetch_add(1, Ordering::SeqCst);
            Box::new(CountdownResult {
                remaining: self.remaining,
                processed: self.processed.clone(),
            })
        }
    }

    impl TaskResult for CountdownResult {
        fn handle_result(self: Box<Self>, _: &mut ChunkManager) -> Vec<Box<dyn Task + Send>> {
            if self.remaining == 0 {
                return Vec::new();
            }
            vec![Box::new(CountdownTask {
                remaining: self.remaining - 1,
                processed: self.processed,
            })]
        }
    }

    fn chunk_manager() -> ChunkManager {
        let config = EngineConfig::default();
        ChunkManager::new(
            &config,
            Arc::new(WorldGenerator::new(&config).unwrap()),
            Arc::new(TextureAtlas::default_layout(config.atlas.columns, config.atlas.rows).unwrap()),
            Arc::new(MemoryEditStore::new()),
        )
    }

    fn countdown(remaining: usize, processed: &Arc<AtomicUsize>) -> Box<dyn Task + Send> {
        Box::new(CountdownTask {
            remaining,
            processed: processed.clone(),
        })
    }

    #[test]
    fn excess_tasks_are_queued() {
        let mut chunk_manager = chunk_manager();
        let mut task_manager = TaskManager::new(2);
        let processed = Arc::new(AtomicUsize::new(0));

        assert!(task_manager.publish_task(countdown(0, &processed)));
        assert!(task_manager.publish_task(countdown(0, &processed)));
        assert!(!task_manager.publish_task(countdown(0, &processed)));
        assert_eq!(task_manager.in_flight_count(), 2);
        assert_eq!(task_manager.queued_count(), 1);

        task_manager.wait_until_idle(&mut chunk_manager);
        assert!(task_manager.is_idle());
        assert_eq!(processed.load(Ordering::SeqCst), 3);
        task_manager.shutdown(&mut chunk_manager);
    }

    #[test]
    fn follow_up_tasks_run_to_completion() {
        let mut chunk_manager = chunk_manager();
        let mut task_manager = TaskManager::new(3);
        let processed = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            task_manager.publish_task(countdown(5, &processed));
        }
        task_manager.wait_until_idle(&mut chunk_manager);

        assert_eq!(processed.load(Ordering::SeqCst), 24);
        task_manager.shutdown(&mut chunk_manager);
    }

    #[test]
    fn shutdown_drains_outstanding_work() {
        let mut chunk_manager = chunk_manager();
        let mut task_manager = TaskManager::new(1);
        let processed = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            task_manager.publish_task(countdown(2, &processed));
        }
        task_manager.shutdown(&mut chunk_manager);

        assert_eq!(processed.load(Ordering::SeqCst), 9);
        assert_eq!(task_manager.worker_count(), 0);
    }

    #[test]
    fn non_blocking_poll_eventually_applies_results() {
        let mut chunk_manager = chunk_manager();
        let mut task_manager = TaskManager::new(1);
        let processed = Arc::new(AtomicUsize::new(0));

        task_manager.publish_task(countdown(0, &processed));
        let mut applied = 0;
        while applied == 0 {
            applied = task_manager.process_completed_tasks(&mut chunk_manager);
            thread::yield_now();
        }

        assert_eq!(applied, 1);
        assert!(task_manager.is_idle());
        task_manager.shutdown(&mut chunk_manager);
    }
}
