//! Purpose: Ordered multi-valued secondary index over one record attribute.
//! Exports: `OrdIndex`.
//! Role: Pure slot-level structure; the store resolves slots back to records.
//! Invariants: No empty key buckets are retained after removal.
//! Invariants: Scans visit keys in ascending order; equal keys in slot order.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Bound, RangeBounds};

use crate::core::slot::Slot;

#[derive(Debug, Default)]
pub struct OrdIndex<K: Ord> {
    buckets: BTreeMap<K, BTreeSet<Slot>>,
    len: usize,
}

impl<K: Ord> OrdIndex<K> {
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds one entry. Returns false if the (key, slot) pair was already
    /// present, which the store treats as an internal invariant breach.
    pub fn insert(&mut self, key: K, slot: Slot) -> bool {
        let added = self.buckets.entry(key).or_default().insert(slot);
        if added {
            self.len += 1;
        }
        added
    }

    /// Removes one entry by its exact key, without scanning. The caller owns
    /// the key-to-slot pairing; the key always comes from the stored record.
    pub fn remove(&mut self, key: &K, slot: Slot) -> bool {
        let Some(bucket) = self.buckets.get_mut(key) else {
            return false;
        };
        let removed = bucket.remove(&slot);
        if removed {
            self.len -= 1;
            if bucket.is_empty() {
                self.buckets.remove(key);
            }
        }
        removed
    }

    pub fn contains(&self, key: &K, slot: Slot) -> bool {
        self.buckets
            .get(key)
            .is_some_and(|bucket| bucket.contains(&slot))
    }

    /// Visits every slot whose key falls in `range`, in ascending key order.
    /// The visitor returns false to stop early. An empty or inverted range
    /// visits nothing.
    pub fn scan_range(&self, range: impl RangeBounds<K>, mut visit: impl FnMut(Slot) -> bool) {
        // BTreeMap::range panics on an inverted range; treat it as empty.
        if range_is_empty(&range) {
            return;
        }
        for (_, bucket) in self.buckets.range(range) {
            for slot in bucket {
                if !visit(*slot) {
                    return;
                }
            }
        }
    }

    /// Visits every slot stored under exactly `key`, in slot order.
    pub fn scan_eq<Q>(&self, key: &Q, mut visit: impl FnMut(Slot) -> bool)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(bucket) = self.buckets.get(key) else {
            return;
        };
        for slot in bucket {
            if !visit(*slot) {
                return;
            }
        }
    }

    /// Visits every entry in the index, ascending by key.
    pub fn scan_all(&self, mut visit: impl FnMut(&K, Slot) -> bool) {
        for (key, bucket) in &self.buckets {
            for slot in bucket {
                if !visit(key, *slot) {
                    return;
                }
            }
        }
    }
}

fn range_is_empty<K: Ord>(range: &impl RangeBounds<K>) -> bool {
    match (range.start_bound(), range.end_bound()) {
        (Bound::Included(start), Bound::Included(end)) => start > end,
        (Bound::Included(start), Bound::Excluded(end))
        | (Bound::Excluded(start), Bound::Included(end))
        | (Bound::Excluded(start), Bound::Excluded(end)) => start >= end,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::OrdIndex;
    use crate::core::record::Record;
    use crate::core::slot::{Slot, SlotArena};
    use std::ops::Bound;

    fn slots(n: usize) -> Vec<Slot> {
        let mut arena = SlotArena::new();
        (0..n)
            .map(|i| arena.insert(Record::new(format!("id{i}"), "t", "u", 0, 0)))
            .collect()
    }

    #[test]
    fn range_scan_visits_in_key_order() {
        let slots = slots(4);
        let mut index = OrdIndex::new();
        index.insert(30, slots[0]);
        index.insert(10, slots[1]);
        index.insert(20, slots[2]);
        index.insert(20, slots[3]);

        let mut seen = Vec::new();
        index.scan_range(10..=25, |slot| {
            seen.push(slot);
            true
        });
        assert_eq!(seen, vec![slots[1], slots[2], slots[3]]);
    }

    #[test]
    fn inverted_range_visits_nothing() {
        let slots = slots(1);
        let mut index = OrdIndex::new();
        index.insert(5, slots[0]);

        // BTreeMap::range would panic on these; the index must treat them as
        // empty instead.
        let (low, high) = (9, 3);
        let mut count = 0;
        index.scan_range(low..=high, |_| {
            count += 1;
            true
        });
        assert_eq!(count, 0);

        index.scan_range((Bound::Excluded(5), Bound::Excluded(5)), |_| {
            count += 1;
            true
        });
        assert_eq!(count, 0);
    }

    #[test]
    fn remove_drops_empty_bucket() {
        let slots = slots(2);
        let mut index = OrdIndex::new();
        index.insert(7, slots[0]);
        index.insert(7, slots[1]);

        assert!(index.remove(&7, slots[0]));
        assert_eq!(index.len(), 1);
        assert!(index.remove(&7, slots[1]));
        assert!(index.is_empty());

        // Removing again reports false instead of touching anything.
        assert!(!index.remove(&7, slots[1]));
    }

    #[test]
    fn scan_eq_stops_on_false() {
        let slots = slots(3);
        let mut index = OrdIndex::new();
        for slot in &slots {
            index.insert("alice".to_string(), *slot);
        }

        let mut count = 0;
        index.scan_eq("alice", |_| {
            count += 1;
            false
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let slots = slots(1);
        let mut index = OrdIndex::new();
        assert!(index.insert(1, slots[0]));
        assert!(!index.insert(1, slots[0]));
        assert_eq!(index.len(), 1);
    }
}
