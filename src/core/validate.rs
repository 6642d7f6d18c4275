// Full-scan consistency checking across the store's four structures.
// Full scans are for explicit validation (tests, debugging); hot paths only
// carry cheap count assertions.
use crate::core::error::{Error, ErrorKind};
use crate::core::store::RecordStore;

/// Walks all four structures and confirms they describe the same record set:
/// equal counts, every primary entry backed by a live arena record, and every
/// index entry keyed by exactly the attribute of the record it points at.
pub fn validate_store(store: &RecordStore) -> Result<(), Error> {
    let count = store.arena().len();
    check_count("primary table", store.primary().len(), count)?;
    check_count("timestamp index", store.timestamp_index().len(), count)?;
    check_count("karma index", store.karma_index().len(), count)?;
    check_count("user index", store.user_index().len(), count)?;

    for (id, &slot) in store.primary() {
        let record = store.arena().get(slot).ok_or_else(|| {
            Error::new(ErrorKind::Internal)
                .with_message("primary entry points at a freed slot")
                .with_id(id)
        })?;
        if record.id != *id {
            return Err(Error::new(ErrorKind::Internal)
                .with_message(format!("primary entry resolves to record {}", record.id))
                .with_id(id));
        }
    }

    for (slot, record) in store.arena().iter() {
        if store.primary().get(&record.id) != Some(&slot) {
            return Err(Error::new(ErrorKind::Internal)
                .with_message("record missing from primary table")
                .with_id(&record.id));
        }
        if !store.timestamp_index().contains(&record.timestamp, slot) {
            return Err(coverage_gap("timestamp index", &record.id));
        }
        if !store.karma_index().contains(&record.karma, slot) {
            return Err(coverage_gap("karma index", &record.id));
        }
        if !store.user_index().contains(&record.user, slot) {
            return Err(coverage_gap("user index", &record.id));
        }
    }

    // Counts match and every live record is covered, so a stale index entry
    // could only exist if some bucket double-counted a slot, which the
    // per-key sets rule out. Still, confirm each entry resolves.
    let mut stale = None;
    store.timestamp_index().scan_all(|key, slot| {
        match store.arena().get(slot) {
            Some(record) if record.timestamp == *key => true,
            _ => {
                stale = Some("timestamp index");
                false
            }
        }
    });
    store.karma_index().scan_all(|key, slot| {
        match store.arena().get(slot) {
            Some(record) if record.karma == *key => true,
            _ => {
                stale = Some("karma index");
                false
            }
        }
    });
    store.user_index().scan_all(|key, slot| {
        match store.arena().get(slot) {
            Some(record) if record.user == *key => true,
            _ => {
                stale = Some("user index");
                false
            }
        }
    });
    if let Some(structure) = stale {
        return Err(Error::new(ErrorKind::Internal)
            .with_message(format!("stale entry in {structure}")));
    }

    Ok(())
}

fn check_count(structure: &str, actual: usize, expected: usize) -> Result<(), Error> {
    if actual != expected {
        return Err(Error::new(ErrorKind::Internal).with_message(format!(
            "{structure} holds {actual} entries, expected {expected}"
        )));
    }
    Ok(())
}

fn coverage_gap(structure: &str, id: &str) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message(format!("record missing from {structure}"))
        .with_id(id)
}

#[cfg(test)]
mod tests {
    use super::validate_store;
    use crate::core::record::Record;
    use crate::core::store::RecordStore;

    #[test]
    fn empty_store_is_valid() {
        let store = RecordStore::new();
        validate_store(&store).expect("valid");
    }

    #[test]
    fn store_stays_valid_through_mixed_workload() {
        let mut store = RecordStore::new();
        let records = [
            ("id1", "master", 100, 1000),
            ("id2", "general2", 100, -10),
            ("id3", "master", 250, 40),
            ("id4", "minion", 300, 0),
        ];
        for (id, user, timestamp, karma) in records {
            store
                .insert(Record::new(id, "body", user, timestamp, karma))
                .expect("insert");
            validate_store(&store).expect("valid after insert");
        }

        store.erase("id2").expect("erase");
        validate_store(&store).expect("valid after erase");

        // Reuse the freed slot under a new id.
        store
            .insert(Record::new("id5", "body", "master", 100, -10))
            .expect("reinsert");
        validate_store(&store).expect("valid after slot reuse");

        let _ = store.erase("missing");
        let _ = store.insert(Record::new("id1", "dup", "x", 0, 0));
        validate_store(&store).expect("valid after rejected mutations");
    }
}
