//! Record definitions
//!
//! The stored unit and its compound identity.

use serde::{Deserialize, Serialize};

/// A stored record: an opaque key, a timestamp that is part of the
/// identity (not a modification-time audit field), and an arbitrary
/// string payload.
///
/// Records are immutable once constructed; updates replace the record
/// at a given identity rather than mutating fields in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque string identifier
    pub key: String,

    /// 64-bit timestamp, part of the identity
    pub timestamp: i64,

    /// Arbitrary string payload
    pub value: String,
}

impl Record {
    /// Create a new record
    pub fn new(key: impl Into<String>, timestamp: i64, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            timestamp,
            value: value.into(),
        }
    }

    /// The identity addressing this record in the store
    pub fn id(&self) -> RecordId {
        RecordId {
            key: self.key.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// The `(key, timestamp)` pair uniquely addressing at most one record.
///
/// Two records with the same key but different timestamps are distinct
/// entries; the store is a multi-version-by-timestamp table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub key: String,
    pub timestamp: i64,
}

impl RecordId {
    /// Create an identity from its parts
    pub fn new(key: impl Into<String>, timestamp: i64) -> Self {
        Self {
            key: key.into(),
            timestamp,
        }
    }
}
