//! # Scene
//!
//! The scene is whatever consumes finished chunks: a renderer, a physics world, or
//! in headless runs just a record of what is attached. The chunk manager only
//! calls it from `ChunkManager::tick`, on the thread that owns the scene.

use std::collections::HashMap;

use crate::engine_state::voxels::chunk::{coordinates::ChunkCoordinate, Chunk};

/// Receiver of chunk attach/detach events.
pub trait Scene {
    /// A finalized chunk becomes part of the scene.
    fn attach(&mut self, chunk: &Chunk);

    /// The chunk at `coordinate` leaves the scene.
    fn detach(&mut self, coordinate: ChunkCoordinate);

    /// An attached chunk was edited and rebuilt.
    fn update(&mut self, chunk: &Chunk) {
        self.detach(chunk.coordinate());
        self.attach(chunk);
    }
}

/// What a headless scene keeps per attached chunk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneChunk {
    pub quads: usize,
    pub collision_triangles: usize,
}

/// Scene that records attached chunks without drawing them.
#[derive(Clone, Debug, Default)]
pub struct HeadlessScene {
    chunks: HashMap<ChunkCoordinate, SceneChunk>,
    attach_count: usize,
    detach_count: usize,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.chunks.contains_key(&coordinate)
    }

    pub fn chunk(&self, coordinate: ChunkCoordinate) -> Option<SceneChunk> {
        self.chunks.get(&coordinate).copied()
    }

    /// Attached coordinates, sorted.
    pub fn coordinates(&self) -> Vec<ChunkCoordinate> {
        let mut coordinates: Vec<_> = self.chunks.keys().copied().collect();
        coordinates.sort_by_key(|coordinate| (coordinate.x, coordinate.y));
        coordinates
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total attach calls so far, including updates.
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    /// Total detach calls so far, including updates.
    pub fn detach_count(&self) -> usize {
        self.detach_count
    }

    /// Quads across every attached chunk.
    pub fn total_quads(&self) -> usize {
        self.chunks.values().map(|chunk| chunk.quads).sum()
    }
}

impl Scene for HeadlessScene {
    fn attach(&mut self, chunk: &Chunk) {
        self.attach_count += 1;
        let entry = SceneChunk {
            quads: chunk.mesh().map_or(0, |mesh| mesh.quad_count()),
            collision_triangles: chunk
                .collision()
                .map_or(0, |collision| collision.triangle_count()),
        };
        self.chunks.insert(chunk.coordinate(), entry);
    }

    fn detach(&mut self, coordinate: ChunkCoordinate) {
        self.detach_count += 1;
        self.chunks.remove(&coordinate);
    }
}
