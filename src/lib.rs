//! Purpose: In-memory record store with ordered secondary indexes.
//! Exports: `core` (records, slot arena, indexes, store, validation, errors).
//! Role: Library-only crate; no CLI, wire format, or persistence surface.
//! Invariants: The store owns every record; callers only ever borrow views.
//! Invariants: Insert and erase keep all four structures in lock-step.
pub mod core;

pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::record::Record;
pub use crate::core::store::RecordStore;
