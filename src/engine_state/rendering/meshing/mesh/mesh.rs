//! Mesh data for one chunk.
//!
//! A [`ChunkMesh`] keeps positions, normals and UVs as parallel streams plus a
//! triangle index list. Every quad contributes four vertices in `[ll, lr, ul, ur]`
//! order and six indices forming the triangles `ll, lr, ur` and `ll, ur, ul`.

use cgmath::{Point3, Vector3};

use crate::engine_state::rendering::{atlas::UvRect, Vertex};

use super::face::Face;

/// Surface geometry of a chunk in chunk-local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one textured quad.
    pub fn add_face(&mut self, face: &Face, uv_rect: &UvRect) {
        let first_vertex = self.positions.len() as u32;
        let normal = face.block_side.normal();

        for (corner, uv) in face.corners().iter().zip(uv_rect.corners()) {
            self.positions.push(Point3::new(
                corner.x as f32,
                corner.y as f32,
                corner.z as f32,
            ));
            self.normals.push(normal);
            self.uvs.push(uv);
        }

        self.indices
            .extend_from_slice(&Self::generate_face_indices(first_vertex));
    }

    /// Index data for a quad whose first vertex is `first_vertex`.
    pub fn generate_face_indices(first_vertex: u32) -> [u32; 6] {
        [
            first_vertex,
            first_vertex + 1,
            first_vertex + 3,
            first_vertex,
            first_vertex + 3,
            first_vertex + 2,
        ]
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Interleaves the streams into renderer-ready vertices.
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((position, normal), uv)| Vertex::new(*position, *normal, *uv))
            .collect()
    }

    /// Triangles as corner positions, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).map(|triangle| {
            [
                self.positions[triangle[0] as usize],
                self.positions[triangle[1] as usize],
                self.positions[triangle[2] as usize],
            ]
        })
    }
}
