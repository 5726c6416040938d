//! # Inventory
//!
//! Block edits consult an [`Inventory`] before mutating a chunk: placing a block
//! consumes one unit of it, mining a block must find room for one unit. A refusal
//! is an ordinary answer and leaves the chunk untouched.
//!
//! The engine owns one inventory and lends it mutably to each edit call.

use crate::engine_state::voxels::block::block_type::BlockType;

/// Accept/reject contract used by block edits.
pub trait Inventory {
    /// Consumes one unit of `block_type`. Returns false if none is available.
    fn try_take(&mut self, block_type: BlockType) -> bool;

    /// Stores one unit of `block_type`. Returns false if there is no room.
    fn try_add(&mut self, block_type: BlockType) -> bool;
}

/// Number of hotbar slots.
pub const HOTBAR_SLOTS: usize = 10;
/// Maximum units per slot.
pub const MAX_STACK_SIZE: u32 = 64;

/// A stack of identical blocks in one slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub block_type: BlockType,
    pub count: u32,
}

/// Ten-slot hotbar. Only the selected slot can be placed from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HotbarInventory {
    slots: [Option<ItemStack>; HOTBAR_SLOTS],
    selected: usize,
}

impl HotbarInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a slot. Out-of-range slots are ignored.
    pub fn select(&mut self, slot: usize) {
        if slot < HOTBAR_SLOTS {
            self.selected = slot;
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Block held in the selected slot, if any.
    pub fn selected_block(&self) -> Option<BlockType> {
        self.slots[self.selected].map(|stack| stack.block_type)
    }

    pub fn slot(&self, slot: usize) -> Option<ItemStack> {
        self.slots.get(slot).copied().flatten()
    }

    /// Total units of `block_type` across all slots.
    pub fn count_of(&self, block_type: BlockType) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.block_type == block_type)
            .map(|stack| stack.count)
            .sum()
    }
}

impl Inventory for HotbarInventory {
    fn try_take(&mut self, block_type: BlockType) -> bool {
        let slot = &mut self.slots[self.selected];
        match slot {
            Some(stack) if stack.block_type == block_type => {
                stack.count -= 1;
                if stack.count == 0 {
                    *slot = None;
                }
                true
            }
            _ => false,
        }
    }

    fn try_add(&mut self, block_type: BlockType) -> bool {
        if block_type.is_air() {
            return false;
        }

        for slot in self.slots.iter_mut() {
            match slot {
                None => {
                    *slot = Some(ItemStack {
                        block_type,
                        count: 1,
                    });
                    return true;
                }
                Some(stack) if stack.block_type == block_type && stack.count < MAX_STACK_SIZE => {
                    stack.count += 1;
                    return true;
                }
                _ => {}
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_fill_before_new_slots_open() {
        let mut inventory = HotbarInventory::new();
        for _ in 0..MAX_STACK_SIZE + 1 {
            assert!(inventory.try_add(BlockType::Dirt));
        }

        assert_eq!(inventory.slot(0).map(|stack| stack.count), Some(MAX_STACK_SIZE));
        assert_eq!(inventory.slot(1).map(|stack| stack.count), Some(1));
        assert_eq!(inventory.count_of(BlockType::Dirt), MAX_STACK_SIZE + 1);
    }

    #[test]
    fn full_hotbar_rejects_more_blocks() {
        let mut inventory = HotbarInventory::new();
        for _ in 0..HOTBAR_SLOTS as u32 * MAX_STACK_SIZE {
            assert!(inventory.try_add(BlockType::Rock));
        }
        assert!(!inventory.try_add(BlockType::Rock));
        assert!(!inventory.try_add(BlockType::Sand));
    }

    #[test]
    fn take_only_from_selected_slot() {
        let mut inventory = HotbarInventory::new();
        inventory.try_add(BlockType::Sand);
        inventory.try_add(BlockType::Grass);

        inventory.select(1);
        assert!(!inventory.try_take(BlockType::Sand));
        assert!(inventory.try_take(BlockType::Grass));
        assert_eq!(inventory.slot(1), None);
        assert!(!inventory.try_take(BlockType::Grass));
    }

    #[test]
    fn air_is_never_stored() {
        let mut inventory = HotbarInventory::new();
        assert!(!inventory.try_add(BlockType::Air));
        assert_eq!(inventory, HotbarInventory::new());
    }
}
