//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Builds the surface mesh of a generated chunk

pub mod chunk_mesh_generation_task;
