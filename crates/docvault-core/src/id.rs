//! Opaque identifier newtypes for stored records.
//!
//! Both IDs wrap a `String` so a `DocumentId` cannot be passed where an
//! `OrderId` is expected. Callers assign IDs before insertion; the store only
//! enforces uniqueness.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Identifier of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

/// Identifier of a confirmed order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl DocumentId {
    /// Builds an ID from the file name plus a nanosecond timestamp.
    ///
    /// Collisions are unlikely but not impossible; the store rejects a
    /// duplicate with a key error rather than overwriting.
    pub fn generate(name: &str) -> Self {
        DocumentId(format!("{}-{}", name, unix_nanos()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl OrderId {
    /// Builds an `order-{nanos}` ID.
    pub fn generate() -> Self {
        OrderId(format!("order-{}", unix_nanos()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        OrderId(s.to_string())
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Nanoseconds since the Unix epoch; a clock before 1970 yields 0.
fn unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}
