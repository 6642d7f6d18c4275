//! Purpose: Define the stored record value type.
//! Exports: `Record`.
//! Role: Immutable unit of storage; all index keys are derived from its fields.
//! Invariants: Fields never change after insert; replacement is erase + insert.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub user: String,
    pub timestamp: i64,
    pub karma: i64,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        user: impl Into<String>,
        timestamp: i64,
        karma: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            user: user.into(),
            timestamp,
            karma,
        }
    }
}
