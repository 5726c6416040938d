//! # Block Side Module
//!
//! This module defines the different faces/sides of a voxel block.
//! It provides the neighbor offsets used for face culling and the outward normals
//! written into meshes.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value used to index per-face tables
/// such as atlas cells. The order is also the emission order of faces for a voxel,
/// which keeps meshes reproducible.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Offset from a voxel to the neighbor that covers this face.
    pub fn neighbor_offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        self.neighbor_offset().cast::<f32>().unwrap_or(Vector3::new(0.0, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn normals_are_unit_and_opposed_in_pairs() {
        for side in BlockSide::all() {
            assert!((side.normal().magnitude() - 1.0).abs() < f32::EPSILON);
        }
        assert_eq!(BlockSide::FRONT.normal(), -BlockSide::BACK.normal());
        assert_eq!(BlockSide::TOP.normal(), -BlockSide::BOTTOM.normal());
        assert_eq!(BlockSide::RIGHT.normal(), -BlockSide::LEFT.normal());
    }
}
