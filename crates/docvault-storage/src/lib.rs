//! Durable storage for docvault documents and orders.
//!
//! Provides the [`PersistenceService`], which owns an embedded SQLite store
//! and flushes a full snapshot of it to a key-value slot after every
//! mutation.
//!
//! # Architecture
//!
//! The storage layer is built bottom-up:
//! - **Engine**: [`SqliteStore`] wraps an in-memory SQLite connection with
//!   CRUD for both tables and whole-image export/restore.
//! - **Snapshot**: the image is base64 encoded ([`codec`]) and wrapped in a
//!   versioned, checksummed envelope ([`snapshot`]).
//! - **Slot**: the envelope is stored under one fixed key in a
//!   [`KeyValueStore`] ([`slot`]).
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`codec`]: base64 text encoding of snapshot bytes
//! - [`snapshot`]: versioned snapshot envelope (legacy and v1)
//! - [`slot`]: KeyValueStore trait with memory and file backends
//! - [`schema`]: SQL schema and migration setup
//! - [`sqlite`]: SqliteStore implementation
//! - [`service`]: PersistenceService lifecycle and CRUD

pub mod codec;
pub mod error;
pub mod schema;
pub mod service;
pub mod slot;
pub mod snapshot;
pub mod sqlite;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use service::{PersistenceService, ServiceStatus};
pub use slot::{FileKeyValue, KeyValueStore, MemoryKeyValue, SNAPSHOT_KEY};
pub use snapshot::SnapshotFormat;
pub use sqlite::SqliteStore;
