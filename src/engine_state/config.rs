//! # Engine Configuration
//!
//! Static configuration for world generation, streaming, and the texture atlas.
//! Configuration is loaded once at startup (JSON via `serde_json`) and validated
//! with [`EngineConfig::validate`] before any component is built. Everything
//! downstream assumes a validated configuration and never re-checks it.
//!
//! Every section carries `#[serde(default)]`, so a config file only needs the
//! fields it overrides:
//!
//! ```
//! use voxel_streaming::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "streaming": { "generation_radius": 3 } }"#).unwrap();
//! assert_eq!(config.streaming.generation_radius, 3);
//! assert_eq!(config.world.chunk_size, 16);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, EngineError};

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub noise: NoiseConfig,
    pub terrain: TerrainConfig,
    pub streaming: StreamingConfig,
    pub atlas: AtlasConfig,
}

/// Chunk and column dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width and depth of a chunk, in blocks.
    pub chunk_size: i32,
    /// Height of every column, in blocks.
    pub terrain_height: i32,
    /// Layers below this are flooded in ocean columns.
    pub sea_level: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: 16,
            terrain_height: 128,
            sea_level: 48,
        }
    }
}

/// Fractal parameters shared by every noise layer.
///
/// Each layer derives its own seed and frequency from these, so changing the seed
/// moves the whole world consistently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: u32,
    /// Base frequency in cycles per block.
    pub frequency: f64,
    pub octaves: usize,
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub gain: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            seed: 1337,
            frequency: 0.01,
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

/// Upper bound of the biome noise for each biome, in ascending order.
///
/// Values above `mountains` also classify as mountains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeThresholds {
    pub ocean: f64,
    pub plains: f64,
    pub forest: f64,
    pub desert: f64,
    pub mountains: f64,
}

impl BiomeThresholds {
    pub fn as_array(&self) -> [f64; 5] {
        [self.ocean, self.plains, self.forest, self.desert, self.mountains]
    }
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        BiomeThresholds {
            ocean: -0.3,
            plains: -0.05,
            forest: 0.15,
            desert: 0.3,
            mountains: 1.0,
        }
    }
}

/// One ore vein band: replaces rock below `max_y` where the vein noise exceeds
/// `threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OreBand {
    pub max_y: i32,
    pub threshold: f64,
}

/// Terrain shaping parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub biome_thresholds: BiomeThresholds,
    /// Layers of dirt (or sand) between rock and the surface block.
    pub subsurface_depth: i32,
    pub cave_threshold: f64,
    pub cave_min_y: i32,
    pub cave_max_y: i32,
    pub lake_threshold: f64,
    pub max_lake_depth: i32,
    pub gold: OreBand,
    pub iron: OreBand,
    pub coal: OreBand,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            biome_thresholds: BiomeThresholds::default(),
            subsurface_depth: 4,
            cave_threshold: 0.55,
            cave_min_y: 8,
            cave_max_y: 56,
            lake_threshold: 0.6,
            max_lake_depth: 4,
            gold: OreBand {
                max_y: 16,
                threshold: 0.8,
            },
            iron: OreBand {
                max_y: 40,
                threshold: 0.72,
            },
            coal: OreBand {
                max_y: 72,
                threshold: 0.65,
            },
        }
    }
}

/// Residency policy around the player.
/// Largest allowed `generation_radius + hysteresis_margin`, in chunks.
pub const MAX_STREAMING_DISTANCE: i32 = 1024;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunks within this Euclidean chunk distance must be resident.
    pub generation_radius: i32,
    /// Loaded chunks are evicted only beyond `generation_radius + hysteresis_margin`.
    pub hysteresis_margin: i32,
    /// Worker pool size. `None` uses the available parallelism.
    pub worker_threads: Option<usize>,
    /// Bound on retained evicted chunks. `None` keeps every evicted chunk.
    pub max_cached_chunks: Option<usize>,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            generation_radius: 5,
            hysteresis_margin: 2,
            worker_threads: None,
            max_cached_chunks: None,
        }
    }
}

impl StreamingConfig {
    /// Resolved worker count.
    pub fn worker_count(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|parallelism| parallelism.get())
                .unwrap_or(1)
        })
    }
}

/// Grid dimensions of the block texture sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub columns: u32,
    pub rows: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            columns: crate::engine_state::voxels::block::STANDARD_ATLAS_COLUMNS,
            rows: crate::engine_state::voxels::block::STANDARD_ATLAS_ROWS,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects any configuration the generator, mesher or streamer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.chunk_size <= 0 {
            return Err(ConfigError::NonPositiveChunkSize(world.chunk_size));
        }
        if world.terrain_height <= 0 {
            return Err(ConfigError::NonPositiveTerrainHeight(world.terrain_height));
        }
        if world.sea_level < 0 || world.sea_level > world.terrain_height {
            return Err(ConfigError::SeaLevelOutOfRange {
                sea_level: world.sea_level,
                terrain_height: world.terrain_height,
            });
        }

        let noise = &self.noise;
        for (name, value) in [
            ("frequency", noise.frequency),
            ("lacunarity", noise.lacunarity),
            ("gain", noise.gain),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidNoiseParameter { name, value });
            }
        }
        if noise.octaves == 0 {
            return Err(ConfigError::InvalidNoiseParameter {
                name: "octaves",
                value: 0.0,
            });
        }

        let terrain = &self.terrain;
        let thresholds = terrain.biome_thresholds.as_array();
        if thresholds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::UnorderedBiomeThresholds(thresholds));
        }
        for (name, value) in [
            ("cave_threshold", terrain.cave_threshold),
            ("lake_threshold", terrain.lake_threshold),
            ("gold", terrain.gold.threshold),
            ("iron", terrain.iron.threshold),
            ("coal", terrain.coal.threshold),
        ] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if terrain.cave_min_y > terrain.cave_max_y {
            return Err(ConfigError::InvertedCaveBand {
                min_y: terrain.cave_min_y,
                max_y: terrain.cave_max_y,
            });
        }

        let streaming = &self.streaming;
        if streaming.generation_radius < 0 {
            return Err(ConfigError::NegativeGenerationRadius(
                streaming.generation_radius,
            ));
        }
        if streaming.hysteresis_margin < 0 {
            return Err(ConfigError::NegativeHysteresisMargin(
                streaming.hysteresis_margin,
            ));
        }
        let distance = streaming.generation_radius as i64 + streaming.hysteresis_margin as i64;
        if distance > MAX_STREAMING_DISTANCE as i64 {
            return Err(ConfigError::StreamingDistanceTooLarge(
                distance,
                MAX_STREAMING_DISTANCE,
            ));
        }
        if streaming.worker_threads == Some(0) {
            return Err(ConfigError::NoWorkerThreads);
        }
        if streaming.max_cached_chunks == Some(0) {
            return Err(ConfigError::ZeroCacheCapacity);
        }

        if self.atlas.columns == 0 || self.atlas.rows == 0 {
            return Err(ConfigError::DegenerateAtlas {
                columns: self.atlas.columns,
                rows: self.atlas.rows,
            });
        }

        Ok(())
    }
}
