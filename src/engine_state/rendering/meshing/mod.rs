//! # Chunk Meshing
//!
//! Converts a block volume into surface geometry by face culling: every face of a
//! non-air voxel whose neighbor is air (or lies outside the volume) becomes one
//! textured quad. Adjacent coplanar faces are never merged, so the quad count
//! equals the exposed surface area of the volume in block faces.
//!
//! Voxels are visited in storage order and their faces in `BlockSide` order, so a
//! given volume always produces the same vertex and index sequence. Collision
//! shapes are derived from that sequence and inherit the same reproducibility.
//!
//! # Example
//! ```
//! use cgmath::Point3;
//! use voxel_streaming::engine_state::rendering::{atlas::TextureAtlas, meshing::build_mesh};
//! use voxel_streaming::engine_state::voxels::{block::block_type::BlockType, chunk::block_volume::BlockVolume};
//!
//! let atlas = TextureAtlas::default_layout(9, 7).unwrap();
//! let mut volume = BlockVolume::new(3, 3, 3);
//! volume.set(Point3::new(1, 1, 1), BlockType::Rock);
//!
//! let mesh = build_mesh(&volume, &atlas);
//! assert_eq!(mesh.quad_count(), 6);
//! ```

pub mod mesh;

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::chunk::block_volume::BlockVolume;

use super::atlas::TextureAtlas;
pub use mesh::{ChunkMesh, Face};

/// Builds the face-culled mesh of a volume.
pub fn build_mesh(volume: &BlockVolume, atlas: &TextureAtlas) -> ChunkMesh {
    let mut mesh = ChunkMesh::new();

    for (position, block_type) in volume.solid_blocks() {
        let (x, y, z) = (position.x as i32, position.y as i32, position.z as i32);

        for side in BlockSide::all() {
            let offset = side.neighbor_offset();
            if volume.is_solid(x + offset.x, y + offset.y, z + offset.z) {
                continue;
            }

            let face = Face::new(position.x, position.y, position.z, block_type, side);
            mesh.add_face(&face, &atlas.uv_rect(block_type, side));
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use cgmath::Point3;

    fn atlas() -> TextureAtlas {
        TextureAtlas::default_layout(9, 7).unwrap()
    }

    #[test]
    fn isolated_voxel_emits_six_quads() {
        let mut volume = BlockVolume::new(3, 3, 3);
        volume.set(Point3::new(1, 1, 1), BlockType::Grass);

        let mesh = build_mesh(&volume, &atlas());
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.normals.len(), 24);
        assert_eq!(mesh.uvs.len(), 24);
    }

    #[test]
    fn fully_enclosed_voxel_emits_nothing_of_its_own() {
        let mut volume = BlockVolume::new(3, 3, 3);
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    volume.set(Point3::new(x, y, z), BlockType::Rock);
                }
            }
        }

        let mesh = build_mesh(&volume, &atlas());
        // Only the 9 outer faces of each side of the cube survive.
        assert_eq!(mesh.quad_count(), 6 * 9);
        let center = Point3::new(1.5f32, 1.5, 1.5);
        for triangle in mesh.triangles() {
            for corner in triangle {
                let on_hull = [corner.x, corner.y, corner.z]
                    .iter()
                    .any(|value| *value == 0.0 || *value == 3.0);
                assert!(on_hull, "interior vertex {corner:?} near {center:?}");
            }
        }
    }

    #[test]
    fn volume_boundary_counts_as_air() {
        let mut volume = BlockVolume::new(1, 1, 1);
        volume.set(Point3::new(0, 0, 0), BlockType::Dirt);
        assert_eq!(build_mesh(&volume, &atlas()).quad_count(), 6);
    }

    #[test]
    fn touching_voxels_hide_shared_faces() {
        let mut volume = BlockVolume::new(4, 4, 4);
        volume.set(Point3::new(1, 1, 1), BlockType::Dirt);
        volume.set(Point3::new(2, 1, 1), BlockType::Sand);

        assert_eq!(build_mesh(&volume, &atlas()).quad_count(), 10);
    }

    #[test]
    fn water_hides_faces_like_any_solid() {
        let mut volume = BlockVolume::new(4, 4, 4);
        volume.set(Point3::new(1, 1, 1), BlockType::Sand);
        volume.set(Point3::new(1, 2, 1), BlockType::Water);

        assert_eq!(build_mesh(&volume, &atlas()).quad_count(), 10);
    }

    #[test]
    fn meshing_is_reproducible() {
        let mut volume = BlockVolume::new(8, 8, 8);
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..120 {
            let position = Point3::new(rng.usize(0..8), rng.usize(0..8), rng.usize(0..8));
            volume.set(position, BlockType::ALL[rng.usize(1..BlockType::COUNT)]);
        }

        let atlas = atlas();
        assert_eq!(build_mesh(&volume, &atlas), build_mesh(&volume, &atlas));
    }

    #[test]
    fn quads_use_the_face_specific_atlas_cell() {
        let atlas = atlas();
        let mut volume = BlockVolume::new(1, 1, 1);
        volume.set(Point3::new(0, 0, 0), BlockType::Grass);

        let mesh = build_mesh(&volume, &atlas);
        let top_quad = BlockSide::TOP as usize;
        let top_rect = atlas.uv_rect(BlockType::Grass, BlockSide::TOP);
        assert_eq!(&mesh.uvs[top_quad * 4..top_quad * 4 + 4], &top_rect.corners());
    }
}
