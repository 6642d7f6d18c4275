//! Purpose: Stable slot arena backing the record store.
//! Exports: `Slot`, `SlotArena`.
//! Role: Owns every stored record; hands out stable locators the indexes hold.
//! Invariants: A `Slot` stays valid for exactly the lifetime of its record.
//! Invariants: Freed slots are reused only after their entry has been cleared.

use crate::core::record::Record;

/// Opaque locator for one stored record. Indexes hold these instead of
/// references, so an erase never invalidates another structure's entries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Slot(u32);

impl Slot {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
pub struct SlotArena {
    cells: Vec<Option<Record>>,
    free: Vec<Slot>,
}

impl SlotArena {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores a record and returns its slot, preferring a freed slot over
    /// growing the arena.
    pub fn insert(&mut self, record: Record) -> Slot {
        match self.free.pop() {
            Some(slot) => {
                debug_assert!(self.cells[slot.index()].is_none());
                self.cells[slot.index()] = Some(record);
                slot
            }
            None => {
                let slot = Slot(self.cells.len() as u32);
                self.cells.push(Some(record));
                slot
            }
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&Record> {
        self.cells.get(slot.index()).and_then(Option::as_ref)
    }

    /// Clears the slot and returns the record. A cleared slot goes on the
    /// free list and must not be referenced by any index afterwards.
    pub fn remove(&mut self, slot: Slot) -> Option<Record> {
        let record = self.cells.get_mut(slot.index()).and_then(Option::take)?;
        self.free.push(slot);
        Some(record)
    }

    /// Visits every live record with its slot, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Record)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|record| (Slot(i as u32), record)))
    }
}
