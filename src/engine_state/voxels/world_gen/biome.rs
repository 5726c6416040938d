//! # Biomes
//!
//! Discrete terrain classes. A biome decides how the height noises are blended and
//! which blocks make up the top of a column.

use crate::engine_state::config::BiomeThresholds;
use crate::engine_state::voxels::block::block_type::BlockType;

/// Terrain classification of a column, in ascending order of the biome noise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Ocean,
    Plains,
    Forest,
    Desert,
    Mountains,
}

/// How a biome turns the three height noises into a height fraction.
///
/// `fraction = base + amplitude * (continent * w0 + mountain * w1 + detail * w2)`
/// with each noise normalized to `[0, 1]` and the weights summing to one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BiomeProfile {
    pub base: f64,
    pub amplitude: f64,
    pub continent_weight: f64,
    pub mountain_weight: f64,
    pub detail_weight: f64,
}

impl Biome {
    /// Classifies a biome noise value against the ordered thresholds.
    pub fn classify(value: f64, thresholds: &BiomeThresholds) -> Biome {
        if value < thresholds.ocean {
            Biome::Ocean
        } else if value < thresholds.plains {
            Biome::Plains
        } else if value < thresholds.forest {
            Biome::Forest
        } else if value < thresholds.desert {
            Biome::Desert
        } else {
            Biome::Mountains
        }
    }

    pub fn profile(self) -> BiomeProfile {
        match self {
            Biome::Ocean => BiomeProfile {
                base: 0.18,
                amplitude: 0.15,
                continent_weight: 0.7,
                mountain_weight: 0.0,
                detail_weight: 0.3,
            },
            Biome::Plains => BiomeProfile {
                base: 0.40,
                amplitude: 0.10,
                continent_weight: 0.6,
                mountain_weight: 0.1,
                detail_weight: 0.3,
            },
            Biome::Forest => BiomeProfile {
                base: 0.42,
                amplitude: 0.14,
                continent_weight: 0.5,
                mountain_weight: 0.2,
                detail_weight: 0.3,
            },
            Biome::Desert => BiomeProfile {
                base: 0.40,
                amplitude: 0.08,
                continent_weight: 0.7,
                mountain_weight: 0.0,
                detail_weight: 0.3,
            },
            Biome::Mountains => BiomeProfile {
                base: 0.50,
                amplitude: 0.40,
                continent_weight: 0.3,
                mountain_weight: 0.6,
                detail_weight: 0.1,
            },
        }
    }

    /// Block on top of a dry column.
    pub fn surface_block(self) -> BlockType {
        match self {
            Biome::Desert | Biome::Ocean => BlockType::Sand,
            _ => BlockType::Grass,
        }
    }

    /// Block between rock and the surface.
    pub fn subsurface_block(self) -> BlockType {
        match self {
            Biome::Desert => BlockType::Sand,
            _ => BlockType::Dirt,
        }
    }

    /// Lakes never form in oceans or on mountains.
    pub fn allows_lakes(self) -> bool {
        !matches!(self, Biome::Ocean | Biome::Mountains)
    }
}
