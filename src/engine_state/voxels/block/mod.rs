//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the standard atlas
//! layout that maps each block face to a cell of the texture sheet.

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for compact storage and serialization of block data.
pub type BlockTypeSize = u8;

/// Maps each block type to its atlas cell `(column, row)` for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 cells, one for each face in the order:
/// [Front, Back, Bottom, Top, Left, Right]
///
/// Cells refer to the standard 9x7 block sheet.
pub static BLOCK_TYPE_TO_ATLAS_CELLS: [[(u32, u32); 6]; 11] = [
    [(0, 0); 6],                                       // AIR (never meshed)
    [(3, 0), (3, 0), (3, 1), (4, 0), (3, 0), (3, 0)], // GRASS (top: grass, bottom: dirt)
    [(3, 1); 6],                                       // DIRT
    [(1, 0); 6],                                       // ROCK
    [(2, 5); 6],                                       // SAND
    [(2, 6); 6],                                       // WATER
    [(5, 1), (5, 1), (6, 1), (6, 1), (5, 1), (5, 1)], // WOOD (rings on top and bottom)
    [(7, 0); 6],                                       // LEAVES
    [(0, 4); 6],                                       // GOLD ORE
    [(0, 1); 6],                                       // IRON ORE
    [(0, 0); 6],                                       // COAL ORE
];

/// Columns of the standard block sheet.
pub const STANDARD_ATLAS_COLUMNS: u32 = 9;
/// Rows of the standard block sheet.
pub const STANDARD_ATLAS_ROWS: u32 = 7;
