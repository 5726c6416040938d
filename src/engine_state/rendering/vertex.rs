//! Vertex record handed to a renderer.
//!
//! Meshes are built as separate position/normal/UV streams; this module packs them
//! into one interleaved, plain-old-data record that can be copied straight into a
//! GPU vertex buffer.

use cgmath::{Point3, Vector3};

/// An interleaved mesh vertex.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), chunk-local
/// - Normal: 3x f32 (12 bytes)
/// - Texture Coordinates: 2x f32 (8 bytes), normalized atlas UV
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    tex_coords: [f32; 2],
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, tex_coords: [f32; 2]) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            tex_coords,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position.into()
    }

    pub fn normal(&self) -> Vector3<f32> {
        self.normal.into()
    }

    pub fn tex_coords(&self) -> [f32; 2] {
        self.tex_coords
    }
}
