//! Mesh data structures for chunk surfaces.
//!
//! # Architecture
//! - [`ChunkMesh`]: position/normal/UV streams and triangle indices for a chunk
//! - [`Face`]: one exposed side of a voxel with its four corners

mod face;
mod mesh;

pub use face::Face;
pub use mesh::ChunkMesh;
