//! # Chunk Iteration Module
//!
//! This module provides an iterator for traversing all non-air blocks in a block
//! volume in storage order (x fastest, then y, then z). The order is fixed, which
//! is what makes meshes and the collision shapes derived from them reproducible.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_type::BlockType;

use super::block_volume::BlockVolume;

/// An iterator over all non-air blocks in a volume.
///
/// The iterator walks the dense storage once and skips air cells, yielding each
/// solid block together with its local position.
pub struct SolidBlockIterator<'a> {
    /// Reference to the volume being iterated over
    volume: &'a BlockVolume,
    /// Current position in the dense storage
    current_offset: usize,
}

impl<'a> SolidBlockIterator<'a> {
    /// Creates a new `SolidBlockIterator` positioned before the first block.
    pub fn new(volume: &'a BlockVolume) -> Self {
        SolidBlockIterator {
            volume,
            current_offset: 0,
        }
    }
}

impl Iterator for SolidBlockIterator<'_> {
    type Item = (Point3<usize>, BlockType);

    /// Gets the next non-air block in the volume along with its position.
    ///
    /// # Performance
    /// - Best case: O(1) when the next block is solid
    /// - Worst case: O(n) when scanning through many air blocks
    fn next(&mut self) -> Option<Self::Item> {
        let blocks = self.volume.blocks();
        while self.current_offset < blocks.len() {
            let offset = self.current_offset;
            self.current_offset += 1;

            let block_type = blocks[offset];
            if !block_type.is_air() {
                return Some((self.volume.position_of(offset), block_type));
            }
        }
        None
    }
}
