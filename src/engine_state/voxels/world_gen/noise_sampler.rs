//! # Noise Sampler
//!
//! Immutable bundle of the noise layers used by terrain generation. Every layer is
//! built once from the configured seed and fractal parameters and holds no cursor
//! or scratch state, so a single sampler can be read from any number of worker
//! threads at once and always returns the same value for the same input.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin, RidgedMulti};

use crate::engine_state::config::{BiomeThresholds, NoiseConfig};

use super::biome::Biome;

/// Frequency multipliers relative to the configured base frequency.
const CONTINENT_SCALE: f64 = 0.5;
const MOUNTAIN_SCALE: f64 = 1.0;
const DETAIL_SCALE: f64 = 4.0;
const BIOME_SCALE: f64 = 0.25;
const CAVE_SCALE: f64 = 5.0;
const ORE_SCALE: f64 = 10.0;
const LAKE_SCALE: f64 = 0.8;

/// Spacing between the sample spaces of distinct ore veins.
const ORE_VEIN_OFFSET: f64 = 1024.0;

/// Ore veins, deepest and rarest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OreVein {
    Gold = 0,
    Iron = 1,
    Coal = 2,
}

/// Stateless height/biome/cave/ore/lake sampling function.
#[derive(Clone, Debug)]
pub struct NoiseSampler {
    continent: Fbm<Perlin>,
    mountain: RidgedMulti<Perlin>,
    detail: Fbm<Perlin>,
    biome: Fbm<Perlin>,
    cave: Fbm<Perlin>,
    ore: Fbm<Perlin>,
    lake: Fbm<Perlin>,
}

fn fractal(config: &NoiseConfig, seed_offset: u32, scale: f64, octaves: usize) -> Fbm<Perlin> {
    Fbm::<Perlin>::new(config.seed.wrapping_add(seed_offset))
        .set_frequency(config.frequency * scale)
        .set_octaves(octaves)
        .set_lacunarity(config.lacunarity)
        .set_persistence(config.gain)
}

/// Maps a noise value from roughly `[-1, 1]` onto `[0, 1]`.
fn normalize(value: f64) -> f64 {
    ((value + 1.0) * 0.5).clamp(0.0, 1.0)
}

impl NoiseSampler {
    pub fn new(config: &NoiseConfig) -> Self {
        NoiseSampler {
            continent: fractal(config, 0, CONTINENT_SCALE, config.octaves),
            mountain: RidgedMulti::<Perlin>::new(config.seed.wrapping_add(1))
                .set_frequency(config.frequency * MOUNTAIN_SCALE)
                .set_octaves(config.octaves)
                .set_lacunarity(config.lacunarity),
            detail: fractal(config, 2, DETAIL_SCALE, config.octaves),
            biome: fractal(config, 3, BIOME_SCALE, config.octaves.min(3)),
            cave: fractal(config, 4, CAVE_SCALE, config.octaves.min(2)),
            ore: fractal(config, 5, ORE_SCALE, 1),
            lake: fractal(config, 6, LAKE_SCALE, config.octaves.min(2)),
        }
    }

    /// Raw biome noise at a world column.
    pub fn biome_value(&self, x: i32, z: i32) -> f64 {
        self.biome.get([x as f64, z as f64])
    }

    pub fn biome(&self, x: i32, z: i32, thresholds: &BiomeThresholds) -> Biome {
        Biome::classify(self.biome_value(x, z), thresholds)
    }

    /// Column height as a fraction of the world height, in `[0, 1]`.
    pub fn height_fraction(&self, x: i32, z: i32, biome: Biome) -> f64 {
        let point = [x as f64, z as f64];
        let profile = biome.profile();

        let blend = normalize(self.continent.get(point)) * profile.continent_weight
            + normalize(self.mountain.get(point)) * profile.mountain_weight
            + normalize(self.detail.get(point)) * profile.detail_weight;

        (profile.base + profile.amplitude * blend).clamp(0.0, 1.0)
    }

    /// 3D cave density; caves are carved where it exceeds the cave threshold.
    pub fn cave(&self, x: i32, y: i32, z: i32) -> f64 {
        self.cave.get([x as f64, y as f64, z as f64])
    }

    /// 3D vein density for one ore. Each vein samples a disjoint region of the
    /// same field so veins of different ores do not line up.
    pub fn ore(&self, x: i32, y: i32, z: i32, vein: OreVein) -> f64 {
        let offset = ORE_VEIN_OFFSET * (vein as u8 as f64 + 1.0);
        self.ore
            .get([x as f64 + offset, y as f64, z as f64 - offset])
    }

    /// Secondary 2D noise deciding where lakes are sunk into the surface.
    pub fn lake(&self, x: i32, z: i32) -> f64 {
        self.lake.get([x as f64, z as f64])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_samplers_agree() {
        let config = NoiseConfig::default();
        let first = NoiseSampler::new(&config);
        let second = NoiseSampler::new(&config);

        for i in -50..50 {
            let (x, z) = (i * 37, i * -11 + 5);
            assert_eq!(first.biome_value(x, z), second.biome_value(x, z));
            assert_eq!(
                first.height_fraction(x, z, Biome::Mountains),
                second.height_fraction(x, z, Biome::Mountains)
            );
            assert_eq!(first.cave(x, i, z), second.cave(x, i, z));
            assert_eq!(
                first.ore(x, i, z, OreVein::Gold),
                second.ore(x, i, z, OreVein::Gold)
            );
        }
    }

    #[test]
    fn height_fraction_stays_in_unit_range() {
        let sampler = NoiseSampler::new(&NoiseConfig::default());
        for i in 0..500 {
            let (x, z) = (i * 13 - 3000, i * 7 + 100);
            for biome in [Biome::Ocean, Biome::Plains, Biome::Mountains] {
                let fraction = sampler.height_fraction(x, z, biome);
                assert!((0.0..=1.0).contains(&fraction));
            }
        }
    }

    #[test]
    fn different_seeds_produce_different_fields() {
        let first = NoiseSampler::new(&NoiseConfig::default());
        let second = NoiseSampler::new(&NoiseConfig {
            seed: 7,
            ..NoiseConfig::default()
        });

        let differs = (0..100).any(|i| first.biome_value(i * 31, i * 17) != second.biome_value(i * 31, i * 17));
        assert!(differs);
    }
}
