//! # Chunk Coordinates
//!
//! Conversions between world block coordinates and the chunk grid.
//!
//! Chunks tile the XZ plane; a chunk spans the full world height. A chunk
//! coordinate is a 2D integer point whose `x` is the grid column along world X and
//! whose `y` is the grid row along world Z.
//!
//! Division is floored, not truncated: world X = -1 lives in chunk -1 at local
//! X = `chunk_size - 1`, not in chunk 0.

use cgmath::{Point2, Point3};

/// World-space chunk grid address. `y` indexes world Z.
pub type ChunkCoordinate = Point2<i32>;

/// Returns the chunk that owns the given world block coordinate.
pub fn chunk_of(world: Point3<i32>, chunk_size: i32) -> ChunkCoordinate {
    Point2::new(
        world.x.div_euclid(chunk_size),
        world.z.div_euclid(chunk_size),
    )
}

/// Splits a world block coordinate into its owning chunk and the coordinate
/// local to that chunk. `y` passes through untouched.
pub fn split_world_position(world: Point3<i32>, chunk_size: i32) -> (ChunkCoordinate, Point3<i32>) {
    let chunk = chunk_of(world, chunk_size);
    let local = Point3::new(
        world.x.rem_euclid(chunk_size),
        world.y,
        world.z.rem_euclid(chunk_size),
    );
    (chunk, local)
}

/// Inverse of [`split_world_position`].
pub fn to_world_position(chunk: ChunkCoordinate, local: Point3<i32>, chunk_size: i32) -> Point3<i32> {
    Point3::new(
        chunk.x * chunk_size + local.x,
        local.y,
        chunk.y * chunk_size + local.z,
    )
}

/// World-space block origin `(x, z)` of a chunk.
pub fn chunk_origin(chunk: ChunkCoordinate, chunk_size: i32) -> (i32, i32) {
    (chunk.x * chunk_size, chunk.y * chunk_size)
}

/// Chunk containing a continuous (player) position.
pub fn chunk_at_position(position: Point3<f32>, chunk_size: i32) -> ChunkCoordinate {
    let world = Point3::new(
        position.x.floor() as i32,
        position.y.floor() as i32,
        position.z.floor() as i32,
    );
    chunk_of(world, chunk_size)
}

/// Euclidean distance between two chunk coordinates, in chunks.
pub fn chunk_distance(a: ChunkCoordinate, b: ChunkCoordinate) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dz = (a.y - b.y) as f32;
    (dx * dx + dz * dz).sqrt()
}

/// Squared distance between two chunk offsets, widened so it cannot overflow.
fn squared_offset(dx: i32, dz: i32) -> i64 {
    let (dx, dz) = (dx as i64, dz as i64);
    dx * dx + dz * dz
}

/// Every chunk within `radius` (inclusive) of `center`, nearest first.
///
/// Ties are broken by coordinate so the order is stable for a given input.
pub fn chunks_in_radius(center: ChunkCoordinate, radius: i32) -> Vec<ChunkCoordinate> {
    let radius_squared = radius as i64 * radius as i64;
    let mut chunks = Vec::new();

    for dx in -radius..=radius {
        for dz in -radius..=radius {
            if squared_offset(dx, dz) <= radius_squared {
                chunks.push(Point2::new(center.x + dx, center.y + dz));
            }
        }
    }

    chunks.sort_by_key(|chunk| {
        (
            squared_offset(chunk.x - center.x, chunk.y - center.y),
            chunk.x,
            chunk.y,
        )
    });
    chunks
}
