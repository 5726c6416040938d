use std::collections::HashSet;

use voxel_streaming::engine_state::rendering::atlas::TextureAtlas;
use voxel_streaming::engine_state::rendering::collision::TrimeshBuilder;
use voxel_streaming::engine_state::rendering::meshing::build_mesh;
use voxel_streaming::engine_state::voxels::block::block_type::BlockType;
use voxel_streaming::engine_state::voxels::world_gen::WorldGenerator;
use voxel_streaming::EngineConfig;

fn world_config(seed: u32) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.world.terrain_height = 64;
    config.world.sea_level = 24;
    config.noise.seed = seed;
    config
}

#[test]
fn independent_generators_agree() {
    let config = world_config(99);
    let first = WorldGenerator::new(&config).unwrap();
    let second = WorldGenerator::new(&config).unwrap();
    let mut rng = fastrand::Rng::with_seed(3);

    for _ in 0..6 {
        let x = rng.i32(-5000..5000);
        let z = rng.i32(-5000..5000);
        assert_eq!(
            *first.generate_block_map(x, z, 16),
            *second.generate_block_map(x, z, 16)
        );
    }
}

#[test]
fn different_seeds_differ() {
    let a = WorldGenerator::new(&world_config(1)).unwrap();
    let b = WorldGenerator::new(&world_config(2)).unwrap();
    let differing = (0..8)
        .filter(|index| *a.generate_block_map(index * 64, 0, 16) != *b.generate_block_map(index * 64, 0, 16))
        .count();
    assert!(differing > 0);
}

#[test]
fn generated_chunk_meshes_are_reproducible_and_well_formed() {
    let config = world_config(5);
    let generator = WorldGenerator::new(&config).unwrap();
    let atlas = TextureAtlas::default_layout(config.atlas.columns, config.atlas.rows).unwrap();
    let volume = generator.generate_block_map(-32, 48, 16);

    let mesh = build_mesh(&volume, &atlas);
    assert_eq!(mesh, build_mesh(&volume, &atlas));
    assert!(!mesh.is_empty());

    assert_eq!(mesh.vertex_count(), mesh.quad_count() * 4);
    assert_eq!(mesh.indices.len(), mesh.quad_count() * 6);
    assert!(mesh.indices.iter().all(|index| (*index as usize) < mesh.vertex_count()));
    assert_eq!(mesh.interleaved().len(), mesh.vertex_count());

    let dimensions = volume.dimensions();
    for position in &mesh.positions {
        assert!(position.x >= 0.0 && position.x <= dimensions.x as f32);
        assert!(position.y >= 0.0 && position.y <= dimensions.y as f32);
        assert!(position.z >= 0.0 && position.z <= dimensions.z as f32);
    }
    for uv in &mesh.uvs {
        assert!((0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1]));
    }

    let collision = TrimeshBuilder::new().build(&mesh);
    assert_eq!(collision.triangle_count(), mesh.triangle_count());
}

#[test]
fn world_uses_several_materials() {
    let generator = WorldGenerator::new(&world_config(11)).unwrap();
    let mut seen = HashSet::new();
    for index in 0..16 {
        let volume = generator.generate_block_map(index * 96, -index * 96, 16);
        seen.extend(volume.blocks().iter().copied());
    }

    assert!(seen.contains(&BlockType::Air));
    assert!(seen.contains(&BlockType::Rock));
    assert!(seen.len() >= 4, "only saw {:?}", seen);
}
