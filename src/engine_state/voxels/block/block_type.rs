//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion from
//! the compact storage representation.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The set is closed: generation, meshing and persistence all match on it
/// exhaustively. Stored edits carry the compact `BlockTypeSize` discriminant,
/// converted back through the `FromPrimitive` derive.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never meshed, never collides.
    #[default]
    Air,
    Grass,
    Dirt,
    Rock,
    Sand,
    Water,
    Wood,
    Leaves,
    GoldOre,
    IronOre,
    CoalOre,
}

impl BlockType {
    /// Number of variants, including `Air`.
    pub const COUNT: usize = 11;

    /// Every block type in discriminant order.
    pub const ALL: [BlockType; Self::COUNT] = [
        BlockType::Air,
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Rock,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Wood,
        BlockType::Leaves,
        BlockType::GoldOre,
        BlockType::IronOre,
        BlockType::CoalOre,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the value does not name a block type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(btype)
    }

    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }
}

impl Serialize for BlockType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as BlockTypeSize)
    }
}

impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = BlockTypeSize::deserialize(deserializer)?;
        BlockType::from_int(value)
            .ok_or_else(|| de::Error::custom(format!("unknown block type {value}")))
    }
}
