//! Purpose: Record store with a primary id table and three secondary indexes.
//! Exports: `RecordStore`.
//! Role: Sole owner of record lifetime; every mutation updates all four
//! structures inside one call.
//! Invariants: Each live record appears exactly once in the primary table and
//! in each secondary index; counts agree across all four structures.
//! Invariants: Duplicate insert and missing erase reject before any mutation.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::error::{Error, ErrorKind};
use crate::core::index::OrdIndex;
use crate::core::record::Record;
use crate::core::slot::{Slot, SlotArena};

#[derive(Debug, Default)]
pub struct RecordStore {
    arena: SlotArena,
    by_id: HashMap<String, Slot>,
    by_timestamp: OrdIndex<i64>,
    by_karma: OrdIndex<i64>,
    by_user: OrdIndex<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records. All four structures agree on this count.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Stores a record under its id. Rejects a duplicate id with
    /// `ErrorKind::AlreadyExists` before touching any structure; on success
    /// the primary table and all three indexes are updated within this call.
    pub fn insert(&mut self, record: Record) -> Result<(), Error> {
        if self.by_id.contains_key(&record.id) {
            return Err(Error::new(ErrorKind::AlreadyExists)
                .with_message("record already present")
                .with_id(&record.id));
        }

        let id = record.id.clone();
        let timestamp = record.timestamp;
        let karma = record.karma;
        let user = record.user.clone();

        // A fresh arena slot can never already be indexed; the count check
        // below catches any drift in debug builds.
        let slot = self.arena.insert(record);
        self.by_timestamp.insert(timestamp, slot);
        self.by_karma.insert(karma, slot);
        self.by_user.insert(user, slot);
        self.by_id.insert(id.clone(), slot);

        debug!(id = %id, count = self.len(), "record inserted");
        self.debug_check_counts();
        Ok(())
    }

    /// Point lookup by id. The returned view is valid until the next mutation.
    pub fn get(&self, id: &str) -> Option<&Record> {
        let slot = *self.by_id.get(id)?;
        self.arena.get(slot)
    }

    /// Removes a record by id and returns it. Each index entry is removed
    /// through the stored slot and the record's own attribute value, so no
    /// index is ever scanned. Rejects a missing id with `ErrorKind::NotFound`.
    pub fn erase(&mut self, id: &str) -> Result<Record, Error> {
        let Some(&slot) = self.by_id.get(id) else {
            return Err(Error::new(ErrorKind::NotFound)
                .with_message("no record under id")
                .with_id(id));
        };

        // The arena still holds the record, so its fields are the exact keys
        // under which the index entries were created.
        let record = self
            .arena
            .get(slot)
            .ok_or_else(|| dangling_slot(id, "primary table"))?;

        if !self.by_timestamp.remove(&record.timestamp, slot) {
            return Err(dangling_slot(id, "timestamp index"));
        }
        if !self.by_karma.remove(&record.karma, slot) {
            return Err(dangling_slot(id, "karma index"));
        }
        if !self.by_user.remove(&record.user, slot) {
            return Err(dangling_slot(id, "user index"));
        }

        self.by_id.remove(id);
        let record = self
            .arena
            .remove(slot)
            .ok_or_else(|| dangling_slot(id, "arena"))?;

        debug!(id = %id, count = self.len(), "record erased");
        self.debug_check_counts();
        Ok(record)
    }

    /// Visits records with `low <= timestamp <= high` in ascending timestamp
    /// order. The visitor returns false to stop the scan early. An inverted
    /// range visits nothing.
    pub fn range_by_timestamp(&self, low: i64, high: i64, visit: impl FnMut(&Record) -> bool) {
        trace!(low, high, "timestamp range scan");
        self.scan_index_range(&self.by_timestamp, low, high, visit);
    }

    /// Visits records with `low <= karma <= high` in ascending karma order.
    pub fn range_by_karma(&self, low: i64, high: i64, visit: impl FnMut(&Record) -> bool) {
        trace!(low, high, "karma range scan");
        self.scan_index_range(&self.by_karma, low, high, visit);
    }

    /// Visits every record whose user equals `user`, in a stable order.
    pub fn all_by_user(&self, user: &str, mut visit: impl FnMut(&Record) -> bool) {
        trace!(user, "user equality scan");
        self.by_user.scan_eq(user, |slot| match self.arena.get(slot) {
            Some(record) => visit(record),
            None => true,
        });
    }

    fn scan_index_range(
        &self,
        index: &OrdIndex<i64>,
        low: i64,
        high: i64,
        mut visit: impl FnMut(&Record) -> bool,
    ) {
        index.scan_range(low..=high, |slot| match self.arena.get(slot) {
            Some(record) => visit(record),
            None => true,
        });
    }

    // Cheap parity check for hot paths; validate::validate_store does the
    // full cross-structure scan.
    fn debug_check_counts(&self) {
        debug_assert_eq!(self.arena.len(), self.by_id.len());
        debug_assert_eq!(self.arena.len(), self.by_timestamp.len());
        debug_assert_eq!(self.arena.len(), self.by_karma.len());
        debug_assert_eq!(self.arena.len(), self.by_user.len());
    }

    pub(crate) fn arena(&self) -> &SlotArena {
        &self.arena
    }

    pub(crate) fn primary(&self) -> &HashMap<String, Slot> {
        &self.by_id
    }

    pub(crate) fn timestamp_index(&self) -> &OrdIndex<i64> {
        &self.by_timestamp
    }

    pub(crate) fn karma_index(&self) -> &OrdIndex<i64> {
        &self.by_karma
    }

    pub(crate) fn user_index(&self) -> &OrdIndex<String> {
        &self.by_user
    }
}

fn dangling_slot(id: &str, structure: &str) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message(format!("stale slot in {structure}"))
        .with_id(id)
}
