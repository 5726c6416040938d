//! # Engine Error Types
//!
//! Generation and meshing are infallible once configuration has been accepted, so
//! the errors here cover startup validation, block edits, and config I/O.

use cgmath::Point3;
use thiserror::Error;

use crate::engine_state::voxels::block::block_type::BlockType;

/// Configuration rejected at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Chunk footprint must be at least one block wide.
    #[error("chunk size must be positive, got {0}")]
    NonPositiveChunkSize(i32),

    #[error("terrain height must be positive, got {0}")]
    NonPositiveTerrainHeight(i32),

    /// Sea level must fall inside the column.
    #[error("sea level {sea_level} outside terrain height {terrain_height}")]
    SeaLevelOutOfRange {
        /// Configured sea level.
        sea_level: i32,
        /// Configured column height.
        terrain_height: i32,
    },

    #[error("generation radius must not be negative, got {0}")]
    NegativeGenerationRadius(i32),

    #[error("hysteresis margin must not be negative, got {0}")]
    NegativeHysteresisMargin(i32),

    /// Radius plus margin must stay within `MAX_STREAMING_DISTANCE` chunks.
    #[error("streaming distance {0} exceeds the maximum of {1} chunks")]
    StreamingDistanceTooLarge(i64, i32),

    #[error("worker thread count must be at least one")]
    NoWorkerThreads,

    #[error("cache capacity must be at least one chunk when bounded")]
    ZeroCacheCapacity,

    /// Biome thresholds must be strictly increasing.
    #[error("biome thresholds must be strictly ascending: {0:?}")]
    UnorderedBiomeThresholds([f64; 5]),

    #[error("invalid noise parameter {name}: {value}")]
    InvalidNoiseParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    #[error("threshold {name} must lie in [-1, 1], got {value}")]
    ThresholdOutOfRange {
        /// Threshold name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    #[error("cave band [{min_y}, {max_y}] is inverted")]
    InvertedCaveBand {
        /// Lowest carved layer.
        min_y: i32,
        /// Highest carved layer.
        max_y: i32,
    },

    /// Atlas grid needs at least one cell in each axis.
    #[error("degenerate atlas grid {columns}x{rows}")]
    DegenerateAtlas {
        /// Grid columns.
        columns: u32,
        /// Grid rows.
        rows: u32,
    },

    #[error("atlas cell ({column}, {row}) for {block_type:?} lies outside the grid")]
    AtlasCellOutOfRange {
        /// Block whose cell is invalid.
        block_type: BlockType,
        /// Cell column.
        column: u32,
        /// Cell row.
        row: u32,
    },
}

/// A block edit that cannot be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("local coordinate {0:?} is outside the chunk")]
    OutOfBounds(Point3<i32>),

    #[error("cannot place air; remove the block instead")]
    AirPlacement,
}

/// Failures of the engine facade outside the hot path.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("block edit failed: {0}")]
    Edit(#[from] EditError),
}
