//! Task for generating mesh data for chunks in a background thread.
//!
//! This module contains the `ChunkMeshGenerationTask`, which builds the surface
//! mesh of a freshly generated chunk on a worker and then returns the chunk to
//! the chunk manager. Collision is built later, on the main thread.

use std::sync::Arc;

use cgmath::Vector3;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::atlas::TextureAtlas,
        task_management::task::{Task, TaskResult},
        voxels::{chunk::Chunk, chunk_manager::ChunkManager},
    },
};

/// A task that generates mesh data for a chunk in a background thread.
pub struct ChunkMeshGenerationTask {
    /// The chunk that needs mesh generation
    chunk: MtResource<Chunk>,
    /// Shared, read-only atlas used for face UVs
    atlas: Arc<TextureAtlas>,
    /// Volume dimensions the chunk manager is configured for
    expected_dimensions: Vector3<usize>,
}

impl ChunkMeshGenerationTask {
    pub fn new(
        chunk: MtResource<Chunk>,
        atlas: Arc<TextureAtlas>,
        expected_dimensions: Vector3<usize>,
    ) -> Self {
        ChunkMeshGenerationTask {
            chunk,
            atlas,
            expected_dimensions,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        {
            let mut chunk = self.chunk.get_mut();
            debug_assert_eq!(
                chunk.current().dimensions(),
                self.expected_dimensions,
                "generated volume does not match the configured chunk dimensions"
            );
            chunk.build_mesh(&self.atlas);
        }

        Box::new(ChunkMeshGenerationTaskResult {
            chunk: self.chunk.clone(),
        })
    }
}

/// A meshed chunk ready to be claimed by the chunk manager.
pub struct ChunkMeshGenerationTaskResult {
    chunk: MtResource<Chunk>,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    fn handle_result(self: Box<Self>, chunk_manager: &mut ChunkManager) -> Vec<Box<dyn Task + Send>> {
        let coordinate = self.chunk.get().coordinate();
        chunk_manager.complete_generation(coordinate, self.chunk);
        Vec::new()
    }
}
