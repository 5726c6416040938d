//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which builds the block data of a
//! claimed chunk on a worker thread. It is scheduled by the chunk manager when a
//! desired chunk is neither loaded nor cached.

use std::sync::Arc;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
        task_management::task::{Task, TaskResult},
        voxels::{
            chunk::{
                coordinates::{chunk_origin, ChunkCoordinate},
                Chunk,
            },
            chunk_manager::ChunkManager,
            persistence::EditStore,
            world_gen::WorldGenerator,
        },
    },
};

/// Generates the baseline volume of a chunk and replays its stored edits.
///
/// This task is responsible for:
/// 1. Fetching (or computing) the baseline volume from the world generator
/// 2. Replaying the chunk's stored edit list onto it
/// 3. Scheduling mesh generation for the resulting chunk
pub struct ChunkGenerationTask {
    generator: Arc<WorldGenerator>,
    edit_store: Arc<dyn EditStore>,
    coordinate: ChunkCoordinate,
    chunk_size: i32,
}

impl ChunkGenerationTask {
    pub fn new(
        generator: Arc<WorldGenerator>,
        edit_store: Arc<dyn EditStore>,
        coordinate: ChunkCoordinate,
        chunk_size: i32,
    ) -> Self {
        ChunkGenerationTask {
            generator,
            edit_store,
            coordinate,
            chunk_size,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let (origin_x, origin_z) = chunk_origin(self.coordinate, self.chunk_size);
        let baseline = self
            .generator
            .generate_block_map(origin_x, origin_z, self.chunk_size);
        let edits = self.edit_store.load(self.coordinate);

        Box::new(ChunkGenerationTaskResult {
            chunk: MtResource::new(Chunk::with_edits(self.coordinate, baseline, &edits)),
        })
    }
}

/// A generated chunk without a mesh yet.
pub struct ChunkGenerationTaskResult {
    chunk: MtResource<Chunk>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Schedules meshing of the chunk on a worker.
    fn handle_result(self: Box<Self>, chunk_manager: &mut ChunkManager) -> Vec<Box<dyn Task + Send>> {
        vec![Box::new(ChunkMeshGenerationTask::new(
            self.chunk,
            chunk_manager.atlas().clone(),
            chunk_manager.chunk_dimensions(),
        ))]
    }
}
