//! # Block Volume Module
//!
//! Dense storage for the blocks of one chunk. Every cell holds a `BlockType`, so
//! lookups are O(1) and edits never reshuffle storage.
//!
//! ## Layout
//!
//! Blocks are stored x-fastest, then y, then z:
//! `index = x + size_x * y + size_x * height * z`.
//!
//! ## Bounds
//!
//! Reads through [`BlockVolume::get`] accept signed coordinates and treat anything
//! outside `[0, size_x) x [0, height) x [0, size_z)` as `Air`, which is what face
//! culling expects at the chunk boundary.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::block_type::BlockType;

use super::chunk_iteration::SolidBlockIterator;

/// A dense 3D array of block types for one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockVolume {
    size_x: usize,
    height: usize,
    size_z: usize,
    blocks: Vec<BlockType>,
}

impl BlockVolume {
    /// Creates a volume of the given dimensions filled with `Air`.
    pub fn new(size_x: usize, height: usize, size_z: usize) -> Self {
        BlockVolume {
            size_x,
            height,
            size_z,
            blocks: vec![BlockType::Air; size_x * height * size_z],
        }
    }

    /// Dimensions as `(size_x, height, size_z)`.
    pub fn dimensions(&self) -> Vector3<usize> {
        Vector3::new(self.size_x, self.height, self.size_z)
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size_z(&self) -> usize {
        self.size_z
    }

    /// Returns true if the signed coordinate lies inside the volume.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.z >= 0
            && (position.x as usize) < self.size_x
            && (position.y as usize) < self.height
            && (position.z as usize) < self.size_z
    }

    /// Converts a signed coordinate to an in-bounds local coordinate.
    pub fn to_local(&self, position: Point3<i32>) -> Option<Point3<usize>> {
        if self.contains(position) {
            Some(Point3::new(
                position.x as usize,
                position.y as usize,
                position.z as usize,
            ))
        } else {
            None
        }
    }

    /// Gets the block at the given signed coordinate.
    ///
    /// # Returns
    /// The stored block, or `Air` for coordinates outside the volume.
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        match self.to_local(Point3::new(x, y, z)) {
            Some(local) => self.blocks[self.index(local)],
            None => BlockType::Air,
        }
    }

    /// Gets the block at an in-bounds local coordinate.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn at(&self, position: Point3<usize>) -> BlockType {
        self.blocks[self.index(position)]
    }

    /// Sets the block at an in-bounds local coordinate.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn set(&mut self, position: Point3<usize>, block_type: BlockType) {
        let index = self.index(position);
        self.blocks[index] = block_type;
    }

    /// True when the block at the signed coordinate is anything but `Air`.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        !self.get(x, y, z).is_air()
    }

    /// Iterates over every non-air block in storage order.
    pub fn solid_blocks(&self) -> SolidBlockIterator<'_> {
        SolidBlockIterator::new(self)
    }

    /// Raw storage in layout order.
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Converts a storage index back into a local coordinate.
    pub fn position_of(&self, index: usize) -> Point3<usize> {
        let plane = self.size_x * self.height;
        Point3::new(
            index % self.size_x,
            (index % plane) / self.size_x,
            index / plane,
        )
    }

    fn index(&self, position: Point3<usize>) -> usize {
        assert!(
            position.x < self.size_x && position.y < self.height && position.z < self.size_z,
            "local coordinate {:?} outside volume {}x{}x{}",
            position,
            self.size_x,
            self.height,
            self.size_z
        );
        position.x + self.size_x * position.y + self.size_x * self.height * position.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_are_air() {
        let mut volume = BlockVolume::new(4, 4, 4);
        volume.set(Point3::new(0, 0, 0), BlockType::Rock);

        assert_eq!(volume.get(0, 0, 0), BlockType::Rock);
        assert_eq!(volume.get(-1, 0, 0), BlockType::Air);
        assert_eq!(volume.get(0, 4, 0), BlockType::Air);
        assert_eq!(volume.get(0, 0, 17), BlockType::Air);
    }

    #[test]
    fn position_of_inverts_index() {
        let volume = BlockVolume::new(3, 5, 2);
        for index in 0..volume.blocks().len() {
            let position = volume.position_of(index);
            assert_eq!(volume.index(position), index);
        }
    }
}
