//! Rendering data for the voxel world.
//!
//! Nothing in here talks to a GPU. It produces the data a renderer collaborator
//! uploads: the texture atlas layout, per-chunk meshes with their interleaved
//! vertex records, and collision shapes derived from those meshes.

pub mod atlas;
pub mod collision;
pub mod meshing;
pub mod tasks;
mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;
