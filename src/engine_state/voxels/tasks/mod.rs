//! # Voxel Task System
//!
//! Tasks that build chunk data off the main thread. A generation task produces
//! the chunk's blocks and hands over to the meshing task in
//! `rendering::tasks`; the finished chunk then returns to the chunk manager.

pub mod chunk_generation_task;
