//! Store Data Model
//!
//! `Record` is the only entity persisted by the harness. `Key` addresses it by kind and name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Properties that predicate queries can filter on. `value` is stored unindexed.
pub const INDEXED_FIELDS: [&str; 3] = ["name", "created_at", "updated_at"];

/// Address of a record: the entity kind plus its string name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub kind: String,
    pub name: String,
}

impl Key {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Builds a record stamped with the current time for both timestamps.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            value: value.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The deterministic record written for iteration `index`.
    pub fn synthetic(index: usize) -> Self {
        Self::new(synthetic_name(index), synthetic_value(index))
    }

    /// Value of an indexed property, rendered as a string for predicate matching.
    ///
    /// Returns `None` for `value` (unindexed) and for unknown fields, so queries on
    /// them match nothing.
    pub fn indexed_property(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "created_at" => Some(self.created_at.to_rfc3339()),
            "updated_at" => Some(self.updated_at.to_rfc3339()),
            _ => None,
        }
    }
}

pub fn synthetic_name(index: usize) -> String {
    format!("name{}", index)
}

pub fn synthetic_value(index: usize) -> String {
    format!("value{}", index)
}
