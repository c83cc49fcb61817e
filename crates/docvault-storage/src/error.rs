//! Storage error types for docvault-storage.
//!
//! [`StorageError`] separates the three failures callers must tell apart:
//! an unusable store ([`StorageError::Init`]), a caller-side key collision
//! ([`StorageError::DuplicateKey`]), and a mutation that applied in memory but
//! could not be flushed ([`StorageError::Durability`]). Deleting a missing
//! record is not an error.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The engine could not be constructed or the stored snapshot is unusable.
    /// Fatal for the service instance; it is not retried.
    #[error("storage initialization failed: {reason}")]
    Init { reason: String },

    /// A record with this primary key already exists. The insert was rejected
    /// and the table is unchanged.
    #[error("duplicate key in {table}: {id}")]
    DuplicateKey { table: &'static str, id: String },

    /// The mutation applied in memory but the snapshot could not be written.
    /// The change may be lost on reload.
    #[error("mutation not durable: {reason}")]
    Durability { reason: String },

    /// The key-value slot refused a value larger than its quota.
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Snapshot text could not be decoded to bytes.
    #[error("decode error: {reason}")]
    Decode { reason: String },

    /// An error from the embedded SQLite engine.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A record failed validation before it was written.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] docvault_core::CoreError),

    /// A stored row could not be turned back into a record.
    #[error("reconstruction error: {reason}")]
    Reconstruction { reason: String },
}
