//! # Collision Shapes
//!
//! Static triangle-soup collision for a chunk, derived from its surface mesh.
//!
//! Shapes are built through a [`TrimeshBuilder`], which admits one build at a time.
//! Every chunk manager shares a single builder and only calls it from the thread
//! that mutates the scene, so finalize work is serialized with attach/detach.

use std::sync::Arc;

use cgmath::Point3;
use parking_lot::Mutex;

use super::meshing::ChunkMesh;

/// Triangles of a chunk surface in chunk-local coordinates, in mesh index order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionShape {
    triangles: Vec<[Point3<f32>; 3]>,
}

impl CollisionShape {
    pub fn triangles(&self) -> &[[Point3<f32>; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Serializes trimesh construction behind a single-slot lock.
#[derive(Clone, Debug, Default)]
pub struct TrimeshBuilder {
    slot: Arc<Mutex<()>>,
}

impl TrimeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the collision shape of a mesh. Blocks while another build holds the slot.
    pub fn build(&self, mesh: &ChunkMesh) -> CollisionShape {
        let _slot = self.slot.lock();
        CollisionShape {
            triangles: mesh.triangles().collect(),
        }
    }

    /// Returns true while a build is running.
    pub fn is_busy(&self) -> bool {
        self.slot.is_locked()
    }
}
