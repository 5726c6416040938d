//! # World Generation
//!
//! Deterministic procedural terrain. [`WorldGenerator::generate_block_map`] turns a
//! chunk origin into a [`BlockVolume`] that depends only on the configuration and
//! the origin: two calls for the same origin, from any threads and in any order,
//! yield identical volumes.
//!
//! ## Column Layout (bottom to top)
//! - rock, with ore veins replacing it below each vein's depth limit
//! - subsurface layers (dirt, or sand in deserts)
//! - one surface block (grass, or sand in deserts and oceans)
//! - water from the surface up to sea level in oceans, or up to the undisturbed
//!   surface where a lake was sunk
//!
//! Caves are then carved out of the solid layers inside a mid-depth band.
//!
//! Finished volumes are memoized per origin. The memo only ever holds values equal
//! to what a fresh computation would produce, so a race between two workers on
//! the same origin is harmless: both compute the same volume and one of them wins
//! the cache slot.

pub mod biome;
pub mod noise_sampler;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::core::ConcurrentMap;
use crate::engine_state::config::{EngineConfig, TerrainConfig};
use crate::engine_state::error::ConfigError;
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::block_volume::BlockVolume;

use biome::Biome;
use noise_sampler::{NoiseSampler, OreVein};

/// Builds and memoizes chunk volumes. Shared between worker threads by `Arc`.
pub struct WorldGenerator {
    sampler: NoiseSampler,
    terrain: TerrainConfig,
    terrain_height: i32,
    sea_level: i32,
    cache: ConcurrentMap<(i32, i32, i32), Arc<BlockVolume>>,
    computed: AtomicUsize,
}

impl WorldGenerator {
    /// Builds a generator for a configuration, rejecting it if invalid.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(WorldGenerator {
            sampler: NoiseSampler::new(&config.noise),
            terrain: config.terrain.clone(),
            terrain_height: config.world.terrain_height,
            sea_level: config.world.sea_level,
            cache: ConcurrentMap::new(),
            computed: AtomicUsize::new(0),
        })
    }

    pub fn terrain_height(&self) -> i32 {
        self.terrain_height
    }

    /// Returns the volume of the `size x terrain_height x size` chunk whose
    /// minimum corner is at world `(origin_x, origin_z)`.
    pub fn generate_block_map(&self, origin_x: i32, origin_z: i32, size: i32) -> Arc<BlockVolume> {
        debug_assert!(size > 0, "chunk size must be positive");

        let key = (origin_x, origin_z, size);
        if let Some(volume) = self.cache.get(&key) {
            return volume;
        }

        let start = Instant::now();
        let volume = Arc::new(self.compute_volume(origin_x, origin_z, size));
        self.computed.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Generated terrain at ({}, {}) in {:?}",
            origin_x,
            origin_z,
            start.elapsed()
        );

        match self.cache.try_insert(key, volume.clone()) {
            Ok(()) => volume,
            // Another worker finished the same origin first; its volume is identical.
            Err(_) => self.cache.get(&key).unwrap_or(volume),
        }
    }

    /// Number of volumes actually computed (memo misses).
    pub fn computed_volumes(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }

    /// Number of memoized volumes.
    pub fn cached_volumes(&self) -> usize {
        self.cache.len()
    }

    /// Biome of a world column.
    pub fn biome_at(&self, x: i32, z: i32) -> Biome {
        self.sampler.biome(x, z, &self.terrain.biome_thresholds)
    }

    /// Unmodified surface height of a world column, before any lake is sunk.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        self.column_height(x, z, self.biome_at(x, z))
    }

    fn column_height(&self, x: i32, z: i32, biome: Biome) -> i32 {
        let fraction = self.sampler.height_fraction(x, z, biome);
        ((fraction * self.terrain_height as f64).floor() as i32).clamp(1, self.terrain_height)
    }

    fn compute_volume(&self, origin_x: i32, origin_z: i32, size: i32) -> BlockVolume {
        let chunk_size = size as usize;
        let mut volume = BlockVolume::new(chunk_size, self.terrain_height as usize, chunk_size);

        for local_z in 0..chunk_size {
            for local_x in 0..chunk_size {
                let world_x = origin_x + local_x as i32;
                let world_z = origin_z + local_z as i32;
                self.fill_column(&mut volume, local_x, local_z, world_x, world_z);
            }
        }

        volume
    }

    fn fill_column(
        &self,
        volume: &mut BlockVolume,
        local_x: usize,
        local_z: usize,
        world_x: i32,
        world_z: i32,
    ) {
        let biome = self.biome_at(world_x, world_z);
        let mut surface = self.column_height(world_x, world_z, biome);
        let mut surface_block = biome.surface_block();
        let mut water_top = if biome == Biome::Ocean {
            self.sea_level
        } else {
            0
        };

        if biome.allows_lakes() {
            if let Some(depth) = self.lake_depth(world_x, world_z, surface) {
                water_top = surface;
                surface -= depth;
                surface_block = BlockType::Sand;
            }
        }

        let subsurface_floor = surface - 1 - self.terrain.subsurface_depth;
        for y in 0..surface {
            let block = if y == surface - 1 {
                surface_block
            } else if y >= subsurface_floor {
                biome.subsurface_block()
            } else {
                self.rock_or_ore(world_x, y, world_z)
            };
            volume.set(Point3::new(local_x, y as usize, local_z), block);
        }

        let cave_top = self.terrain.cave_max_y.min(surface - 2);
        for y in self.terrain.cave_min_y.max(0)..=cave_top {
            if self.sampler.cave(world_x, y, world_z) > self.terrain.cave_threshold {
                volume.set(Point3::new(local_x, y as usize, local_z), BlockType::Air);
            }
        }

        for y in surface..water_top.min(self.terrain_height) {
            volume.set(Point3::new(local_x, y as usize, local_z), BlockType::Water);
        }
    }

    /// Depth a lake sinks the surface by at this column, if any.
    fn lake_depth(&self, x: i32, z: i32, surface: i32) -> Option<i32> {
        let threshold = self.terrain.lake_threshold;
        let value = self.sampler.lake(x, z);
        if value <= threshold || surface <= 1 {
            return None;
        }

        let excess = ((value - threshold) / (1.0 - threshold)).clamp(0.0, 1.0);
        let depth = (excess * self.terrain.max_lake_depth as f64).ceil() as i32;
        let depth = depth.clamp(1, surface - 1);
        (self.terrain.max_lake_depth > 0).then_some(depth)
    }

    fn rock_or_ore(&self, x: i32, y: i32, z: i32) -> BlockType {
        let terrain = &self.terrain;
        let veins = [
            (OreVein::Gold, &terrain.gold, BlockType::GoldOre),
            (OreVein::Iron, &terrain.iron, BlockType::IronOre),
            (OreVein::Coal, &terrain.coal, BlockType::CoalOre),
        ];

        for (vein, band, block) in veins {
            if y < band.max_y && self.sampler.ore(x, y, z, vein) > band.threshold {
                return block;
            }
        }
        BlockType::Rock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.world.chunk_size = 8;
        config.world.terrain_height = 96;
        config
    }

    #[test]
    fn generation_is_deterministic_across_generators() {
        let config = small_config();
        let first = WorldGenerator::new(&config).unwrap();
        let second = WorldGenerator::new(&config).unwrap();

        for (x, z) in [(0, 0), (-8, 24), (640, -1024)] {
            assert_eq!(
                *first.generate_block_map(x, z, 8),
                *second.generate_block_map(x, z, 8)
            );
        }
    }

    #[test]
    fn memoized_volume_is_shared() {
        let generator = WorldGenerator::new(&small_config()).unwrap();
        let first = generator.generate_block_map(16, 16, 8);
        let second = generator.generate_block_map(16, 16, 8);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(generator.computed_volumes(), 1);
        assert_eq!(generator.cached_volumes(), 1);
    }

    #[test]
    fn volume_has_configured_dimensions() {
        let generator = WorldGenerator::new(&small_config()).unwrap();
        let volume = generator.generate_block_map(-8, -8, 8);
        let dimensions = volume.dimensions();
        assert_eq!((dimensions.x, dimensions.y, dimensions.z), (8, 96, 8));
    }

    #[test]
    fn bedrock_layer_is_solid_and_ores_respect_depth_limits() {
        let config = small_config();
        let generator = WorldGenerator::new(&config).unwrap();

        for origin in [0, 64, -128] {
            let volume = generator.generate_block_map(origin, origin, 8);
            for (position, block) in volume.solid_blocks() {
                let y = position.y as i32;
                match block {
                    BlockType::GoldOre => assert!(y < config.terrain.gold.max_y),
                    BlockType::IronOre => assert!(y < config.terrain.iron.max_y),
                    BlockType::CoalOre => assert!(y < config.terrain.coal.max_y),
                    _ => {}
                }
            }
            for z in 0..8 {
                for x in 0..8 {
                    assert!(volume.is_solid(x, 0, z));
                }
            }
        }
    }

    #[test]
    fn concurrent_generation_agrees() {
        let generator = Arc::new(WorldGenerator::new(&small_config()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || (*generator.generate_block_map(32, -40, 8)).clone())
            })
            .collect();

        let volumes: Vec<BlockVolume> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert!(volumes.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(generator.cached_volumes(), 1);
    }

    #[test]
    fn ocean_columns_are_flooded_to_sea_level() {
        let config = small_config();
        let generator = WorldGenerator::new(&config).unwrap();

        let mut checked = 0;
        'search: for cx in -40..40 {
            for cz in -40..40 {
                let (x, z) = (cx * 97, cz * 89);
                if generator.biome_at(x, z) != Biome::Ocean {
                    continue;
                }
                let surface = generator.surface_height(x, z);
                if surface >= config.world.sea_level {
                    continue;
                }
                let volume = generator.generate_block_map(x, z, 1);
                assert_eq!(volume.get(0, surface, 0), BlockType::Water);
                assert_eq!(volume.get(0, config.world.sea_level - 1, 0), BlockType::Water);
                assert_eq!(volume.get(0, config.world.sea_level, 0), BlockType::Air);
                checked += 1;
                if checked == 5 {
                    break 'search;
                }
            }
        }
        assert!(checked > 0);
    }

    /// Biome, undisturbed surface and lake depth of a world column.
    fn column(generator: &WorldGenerator, x: i32, z: i32) -> (Biome, i32, Option<i32>) {
        let biome = generator.biome_at(x, z);
        let surface = generator.surface_height(x, z);
        let lake = if biome.allows_lakes() {
            generator.lake_depth(x, z, surface)
        } else {
            None
        };
        (biome, surface, lake)
    }

    fn grid() -> impl Iterator<Item = (i32, i32)> {
        (-80..80).flat_map(|cx| (-80..80).map(move |cz| (cx * 13, cz * 17)))
    }

    #[test]
    fn lakes_hold_water_over_sand() {
        let config = small_config();
        let generator = WorldGenerator::new(&config).unwrap();

        let mut lakes = 0;
        for (x, z) in grid() {
            let (biome, surface, Some(depth)) = column(&generator, x, z) else {
                continue;
            };
            assert!(biome != Biome::Ocean && biome != Biome::Mountains);

            let floor = surface - depth;
            let volume = generator.generate_block_map(x, z, 1);
            assert_eq!(volume.get(0, floor - 1, 0), BlockType::Sand);
            for y in floor..surface {
                assert_eq!(volume.get(0, y, 0), BlockType::Water);
            }
            assert_eq!(volume.get(0, surface, 0), BlockType::Air);

            lakes += 1;
            if lakes == 5 {
                break;
            }
        }
        assert!(lakes > 0);
    }

    #[test]
    fn mountain_columns_never_hold_water() {
        let generator = WorldGenerator::new(&small_config()).unwrap();

        let mut checked = 0;
        for (x, z) in grid() {
            if generator.biome_at(x, z) != Biome::Mountains {
                continue;
            }
            let volume = generator.generate_block_map(x, z, 1);
            assert!(volume.blocks().iter().all(|block| *block != BlockType::Water));

            checked += 1;
            if checked == 20 {
                break;
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn caves_stay_inside_their_band() {
        let mut config = small_config();
        config.terrain.cave_threshold = 0.2;
        let generator = WorldGenerator::new(&config).unwrap();

        let mut carved = 0;
        for (x, z) in grid().step_by(97).take(200) {
            let (_, surface, lake) = column(&generator, x, z);
            let top = surface - lake.unwrap_or(0);
            let band_top = config.terrain.cave_max_y.min(top - 2);

            let volume = generator.generate_block_map(x, z, 1);
            for y in 0..top {
                if volume.get(0, y, 0) == BlockType::Air {
                    assert!(
                        (config.terrain.cave_min_y..=band_top).contains(&y),
                        "air at y={} outside cave band of column ({}, {})",
                        y,
                        x,
                        z
                    );
                    carved += 1;
                }
            }
        }
        assert!(carved > 0);
    }

    #[test]
    fn desert_columns_are_sand_down_to_rock() {
        let mut config = small_config();
        config.terrain.cave_threshold = 1.0;
        let generator = WorldGenerator::new(&config).unwrap();

        let mut checked = 0;
        for (x, z) in grid() {
            let (biome, surface, lake) = column(&generator, x, z);
            if biome != Biome::Desert || lake.is_some() {
                continue;
            }

            let volume = generator.generate_block_map(x, z, 1);
            let subsurface_floor = (surface - 1 - config.terrain.subsurface_depth).max(0);
            for y in subsurface_floor..surface {
                assert_eq!(volume.get(0, y, 0), BlockType::Sand);
            }
            if subsurface_floor > 0 {
                assert_ne!(volume.get(0, subsurface_floor - 1, 0), BlockType::Sand);
            }

            checked += 1;
            if checked == 10 {
                break;
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn every_ore_appears_inside_its_band() {
        let mut config = small_config();
        config.terrain.gold.threshold = 0.2;
        config.terrain.iron.threshold = 0.2;
        config.terrain.coal.threshold = 0.2;
        let generator = WorldGenerator::new(&config).unwrap();

        let mut counts = [0usize; 3];
        for origin in [0, 256, -512, 1024] {
            let volume = generator.generate_block_map(origin, -origin, 8);
            for (position, block) in volume.solid_blocks() {
                let y = position.y as i32;
                let (index, band) = match block {
                    BlockType::GoldOre => (0, &config.terrain.gold),
                    BlockType::IronOre => (1, &config.terrain.iron),
                    BlockType::CoalOre => (2, &config.terrain.coal),
                    _ => continue,
                };
                assert!(y < band.max_y, "{:?} at y={}", block, y);
                counts[index] += 1;
            }
        }
        assert!(counts.iter().all(|count| *count > 0), "ore counts {:?}", counts);
    }
}
