//! # Chunk Module
//!
//! A chunk is one `chunk_size x terrain_height x chunk_size` column of the world.
//! It keeps two volumes:
//!
//! - `baseline`: the generator's output, shared with the generator's memo and
//!   never mutated
//! - `current`: what the player sees, i.e. the baseline with the player's edits
//!
//! plus the edit delta between them. The delta only holds cells where `current`
//! differs from `baseline`; reverting a cell to its generated block removes its
//! entry. The delta is what gets persisted.
//!
//! ## Lifecycle
//!
//! `Generated` (volumes ready) → `MeshBuilt` (surface mesh ready, built on a
//! worker) → `Finalized` (collision shape built on the main thread). Every
//! accepted edit rebuilds both mesh and collision synchronously before returning,
//! so an edited chunk is always finalized again afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Point3;
use log::{debug, warn};

use crate::engine_state::error::EditError;
use crate::engine_state::inventory::Inventory;
use crate::engine_state::rendering::{
    atlas::TextureAtlas,
    collision::{CollisionShape, TrimeshBuilder},
    meshing::{build_mesh, ChunkMesh},
};

use super::block::block_type::BlockType;
use super::persistence::BlockEdit;
use block_volume::BlockVolume;
use coordinates::ChunkCoordinate;

pub mod block_volume;
pub mod chunk_iteration;
pub mod coordinates;

/// Build progress of a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    Generated,
    MeshBuilt,
    Finalized,
}

/// Result of an edit the inventory may refuse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The chunk changed and was rebuilt.
    Applied,
    /// Nothing changed.
    Rejected,
}

/// One column of the world with its edits, mesh and collision.
pub struct Chunk {
    coordinate: ChunkCoordinate,
    baseline: Arc<BlockVolume>,
    current: BlockVolume,
    edits: HashMap<Point3<usize>, BlockType>,
    mesh: Option<ChunkMesh>,
    collision: Option<CollisionShape>,
    state: ChunkState,
}

impl Chunk {
    /// Creates an unedited chunk over a generated baseline.
    pub fn new(coordinate: ChunkCoordinate, baseline: Arc<BlockVolume>) -> Self {
        Chunk {
            coordinate,
            current: (*baseline).clone(),
            baseline,
            edits: HashMap::new(),
            mesh: None,
            collision: None,
            state: ChunkState::Generated,
        }
    }

    /// Creates a chunk and replays stored edits onto it.
    ///
    /// Edits outside the volume are skipped; edits equal to the baseline are
    /// dropped, so the resulting delta is minimal even for a stale edit list.
    pub fn with_edits(
        coordinate: ChunkCoordinate,
        baseline: Arc<BlockVolume>,
        edits: &[BlockEdit],
    ) -> Self {
        let mut chunk = Chunk::new(coordinate, baseline);
        for edit in edits {
            let position = edit.position;
            if !chunk.baseline.contains(position.cast().unwrap_or(Point3::new(-1, -1, -1))) {
                warn!(
                    "Skipping stored edit at {:?} outside chunk {:?}",
                    position, coordinate
                );
                continue;
            }
            chunk.write(position, edit.block_type);
        }
        chunk
    }

    pub fn coordinate(&self) -> ChunkCoordinate {
        self.coordinate
    }

    pub fn baseline(&self) -> &Arc<BlockVolume> {
        &self.baseline
    }

    pub fn current(&self) -> &BlockVolume {
        &self.current
    }

    /// Block at a local coordinate; `Air` outside the chunk.
    pub fn block_at(&self, local: Point3<i32>) -> BlockType {
        self.current.get(local.x, local.y, local.z)
    }

    pub fn edits(&self) -> &HashMap<Point3<usize>, BlockType> {
        &self.edits
    }

    /// The edit delta as a list sorted by `(x, y, z)`.
    pub fn edit_list(&self) -> Vec<BlockEdit> {
        let mut edits: Vec<BlockEdit> = self
            .edits
            .iter()
            .map(|(position, block_type)| BlockEdit {
                position: *position,
                block_type: *block_type,
            })
            .collect();
        edits.sort_by_key(|edit| (edit.position.x, edit.position.y, edit.position.z));
        edits
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    pub fn collision(&self) -> Option<&CollisionShape> {
        self.collision.as_ref()
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == ChunkState::Finalized
    }

    /// Rebuilds the surface mesh from the current volume.
    pub fn build_mesh(&mut self, atlas: &TextureAtlas) {
        self.mesh = Some(build_mesh(&self.current, atlas));
        self.collision = None;
        self.state = ChunkState::MeshBuilt;
    }

    /// Builds the collision shape from the mesh.
    ///
    /// Must run on the thread that owns the scene; the builder serializes calls.
    pub fn finalize(&mut self, atlas: &TextureAtlas, builder: &TrimeshBuilder) {
        if self.mesh.is_none() {
            self.build_mesh(atlas);
        }
        if let Some(mesh) = &self.mesh {
            self.collision = Some(builder.build(mesh));
            self.state = ChunkState::Finalized;
        }
    }

    /// Places `block_type` at a local coordinate, consuming one unit from the
    /// inventory. An occupied cell is overwritten.
    pub fn place_block(
        &mut self,
        local: Point3<i32>,
        block_type: BlockType,
        inventory: &mut dyn Inventory,
        atlas: &TextureAtlas,
        builder: &TrimeshBuilder,
    ) -> Result<EditOutcome, EditError> {
        if block_type.is_air() {
            return Err(EditError::AirPlacement);
        }
        let position = self
            .current
            .to_local(local)
            .ok_or(EditError::OutOfBounds(local))?;

        if !inventory.try_take(block_type) {
            debug!("Inventory has no {:?} to place at {:?}", block_type, local);
            return Ok(EditOutcome::Rejected);
        }

        self.write(position, block_type);
        self.rebuild(atlas, builder);
        Ok(EditOutcome::Applied)
    }

    /// Mines the block at a local coordinate into the inventory.
    ///
    /// Mining air, or a block the inventory has no room for, changes nothing.
    pub fn remove_block(
        &mut self,
        local: Point3<i32>,
        inventory: &mut dyn Inventory,
        atlas: &TextureAtlas,
        builder: &TrimeshBuilder,
    ) -> Result<EditOutcome, EditError> {
        let position = self
            .current
            .to_local(local)
            .ok_or(EditError::OutOfBounds(local))?;

        let block_type = self.current.at(position);
        if block_type.is_air() {
            return Ok(EditOutcome::Rejected);
        }
        if !inventory.try_add(block_type) {
            debug!("Inventory has no room for {:?} mined at {:?}", block_type, local);
            return Ok(EditOutcome::Rejected);
        }

        self.write(position, BlockType::Air);
        self.rebuild(atlas, builder);
        Ok(EditOutcome::Applied)
    }

    fn write(&mut self, position: Point3<usize>, block_type: BlockType) {
        self.current.set(position, block_type);
        if self.baseline.at(position) == block_type {
            self.edits.remove(&position);
        } else {
            self.edits.insert(position, block_type);
        }
    }

    fn rebuild(&mut self, atlas: &TextureAtlas, builder: &TrimeshBuilder) {
        self.build_mesh(atlas);
        self.finalize(atlas, builder);
    }
}
