//! # Texture Atlas
//!
//! Every block face is drawn from one cell of a single texture sheet divided into
//! a `columns x rows` grid. The atlas maps `(BlockType, BlockSide)` to a cell and
//! turns that cell into a normalized UV rectangle:
//!
//! - `offset = (column / columns, row / rows)`
//! - `size = (1 / columns, 1 / rows)`
//!
//! No half-texel inset is applied. The atlas is immutable once built and is shared
//! with the meshing workers by `Arc`.

use cgmath::Vector2;

use crate::engine_state::error::ConfigError;
use crate::engine_state::voxels::block::{
    block_side::BlockSide, block_type::BlockType, BLOCK_TYPE_TO_ATLAS_CELLS,
};

/// A normalized rectangle on the atlas sheet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvRect {
    /// Upper-left corner in `[0, 1]`.
    pub offset: Vector2<f32>,
    /// Width and height in `[0, 1]`.
    pub size: Vector2<f32>,
}

impl UvRect {
    /// Corner UVs in `[ll, lr, ul, ur]` order, with `v` growing downwards.
    pub fn corners(&self) -> [[f32; 2]; 4] {
        let (u0, v0) = (self.offset.x, self.offset.y);
        let (u1, v1) = (u0 + self.size.x, v0 + self.size.y);
        [[u0, v1], [u1, v1], [u0, v0], [u1, v0]]
    }
}

/// Read-only `(block, face) -> cell` table plus grid dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureAtlas {
    columns: u32,
    rows: u32,
    cells: [[(u32, u32); 6]; BlockType::COUNT],
}

impl TextureAtlas {
    /// Builds an atlas from an explicit cell table, indexed by block type then by
    /// `BlockSide`.
    pub fn new(
        columns: u32,
        rows: u32,
        cells: [[(u32, u32); 6]; BlockType::COUNT],
    ) -> Result<Self, ConfigError> {
        if columns == 0 || rows == 0 {
            return Err(ConfigError::DegenerateAtlas { columns, rows });
        }

        for block_type in BlockType::ALL {
            for (column, row) in cells[block_type as usize] {
                if column >= columns || row >= rows {
                    return Err(ConfigError::AtlasCellOutOfRange {
                        block_type,
                        column,
                        row,
                    });
                }
            }
        }

        Ok(TextureAtlas {
            columns,
            rows,
            cells,
        })
    }

    /// The standard block sheet layout on a grid of the given size.
    pub fn default_layout(columns: u32, rows: u32) -> Result<Self, ConfigError> {
        Self::new(columns, rows, BLOCK_TYPE_TO_ATLAS_CELLS)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Grid cell `(column, row)` drawn on one face of a block.
    pub fn cell(&self, block_type: BlockType, side: BlockSide) -> (u32, u32) {
        self.cells[block_type as usize][side as usize]
    }

    pub fn uv_rect(&self, block_type: BlockType, side: BlockSide) -> UvRect {
        let (column, row) = self.cell(block_type, side);
        let (columns, rows) = (self.columns as f32, self.rows as f32);
        UvRect {
            offset: Vector2::new(column as f32 / columns, row as f32 / rows),
            size: Vector2::new(1.0 / columns, 1.0 / rows),
        }
    }
}
