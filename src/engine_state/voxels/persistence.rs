//! # Edit Persistence
//!
//! Generated terrain is never stored: it is a pure function of the configuration.
//! What must survive unloading is the player's edit list for each chunk, which is
//! replayed onto a freshly generated baseline when the chunk loads again.
//!
//! An [`EditStore`] is shared between the main thread (which writes edit lists
//! after every successful edit) and the generation workers (which read them), so
//! implementations must be `Send + Sync`.

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::core::ConcurrentMap;

use super::block::block_type::BlockType;
use super::chunk::coordinates::ChunkCoordinate;

/// One edited cell of a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEdit {
    /// Chunk-local position.
    pub position: Point3<usize>,
    pub block_type: BlockType,
}

/// The full edit list of one chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkEdits {
    pub coordinate: ChunkCoordinate,
    pub blocks: Vec<BlockEdit>,
}

/// A saved set of chunks, serialized as one JSON document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRegion {
    pub chunks: Vec<ChunkEdits>,
}

impl SavedRegion {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Source and sink of per-chunk edit lists.
pub trait EditStore: Send + Sync {
    /// Edit list of a chunk; empty when the chunk was never edited.
    fn load(&self, coordinate: ChunkCoordinate) -> Vec<BlockEdit>;

    /// Replaces the edit list of a chunk. An empty list forgets the chunk.
    fn store(&self, coordinate: ChunkCoordinate, edits: Vec<BlockEdit>);
}

/// Edit lists held in memory.
#[derive(Clone, Default)]
pub struct MemoryEditStore {
    chunks: ConcurrentMap<ChunkCoordinate, Vec<BlockEdit>>,
}

impl MemoryEditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored chunk, sorted by coordinate.
    pub fn export(&self) -> SavedRegion {
        let mut chunks: Vec<ChunkEdits> = self
            .chunks
            .entries()
            .into_iter()
            .map(|(coordinate, blocks)| ChunkEdits { coordinate, blocks })
            .collect();
        chunks.sort_by_key(|chunk| (chunk.coordinate.x, chunk.coordinate.y));
        SavedRegion { chunks }
    }

    /// Replaces the stored lists of every chunk in `region`.
    pub fn import(&self, region: SavedRegion) {
        for chunk in region.chunks {
            self.store(chunk.coordinate, chunk.blocks);
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl EditStore for MemoryEditStore {
    fn load(&self, coordinate: ChunkCoordinate) -> Vec<BlockEdit> {
        self.chunks.get(&coordinate).unwrap_or_default()
    }

    fn store(&self, coordinate: ChunkCoordinate, edits: Vec<BlockEdit>) {
        if edits.is_empty() {
            self.chunks.remove(&coordinate);
        } else {
            self.chunks.insert(coordinate, edits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    fn edit(x: usize, y: usize, z: usize, block_type: BlockType) -> BlockEdit {
        BlockEdit {
            position: Point3::new(x, y, z),
            block_type,
        }
    }

    #[test]
    fn empty_list_forgets_chunk() {
        let store = MemoryEditStore::new();
        let coordinate = Point2::new(-3, 4);

        store.store(coordinate, vec![edit(1, 2, 3, BlockType::Wood)]);
        assert_eq!(store.load(coordinate).len(), 1);

        store.store(coordinate, Vec::new());
        assert!(store.is_empty());
        assert!(store.load(coordinate).is_empty());
    }

    #[test]
    fn region_survives_json() {
        let store = MemoryEditStore::new();
        store.store(Point2::new(1, 0), vec![edit(0, 64, 15, BlockType::Air)]);
        store.store(Point2::new(-1, 2), vec![edit(4, 10, 4, BlockType::GoldOre)]);

        let json = store.export().to_json().unwrap();
        let restored = MemoryEditStore::new();
        restored.import(SavedRegion::from_json(&json).unwrap());

        assert_eq!(restored.export(), store.export());
        assert_eq!(restored.export().chunks[0].coordinate, Point2::new(-1, 2));
    }

    #[test]
    fn edits_store_block_types_compactly() {
        let json = serde_json::to_string(&edit(1, 2, 3, BlockType::IronOre)).unwrap();
        assert_eq!(json, r#"{"position":{"x":1,"y":2,"z":3},"block_type":9}"#);

        let corrupt = r#"{"chunks":[{"coordinate":{"x":0,"y":0},"blocks":[{"position":{"x":0,"y":0,"z":0},"block_type":200}]}]}"#;
        assert!(SavedRegion::from_json(corrupt).is_err());
    }
}

