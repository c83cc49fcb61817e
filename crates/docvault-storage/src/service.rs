//! PersistenceService: the single owner of the document/order store.
//!
//! The service holds the live [`SqliteStore`] and a durable key-value slot.
//! Every mutation writes the full database image to the slot before
//! returning, so a new service over the same slot sees everything that was
//! acknowledged.
//!
//! # Lifecycle
//!
//! `Uninitialized -> Ready` or `Uninitialized -> Failed`. Any operation on an
//! uninitialized service initializes it first. A failed service reports the
//! original initialization error on every call and never writes to the slot,
//! so a snapshot it could not read is left in place.
//!
//! Methods take `&mut self`; a multi-threaded host shares the service behind a
//! mutex.

use tracing::{debug, info, warn};

use docvault_core::{DocumentId, DocumentRecord, OrderId, OrderRecord};

use crate::error::StorageError;
use crate::slot::{KeyValueStore, SNAPSHOT_KEY};
use crate::snapshot::{self, SnapshotFormat};
use crate::sqlite::SqliteStore;

enum ServiceState {
    Uninitialized,
    Ready(SqliteStore),
    Failed(String),
}

/// Externally visible lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Uninitialized,
    Ready,
    Failed { reason: String },
}

/// Durable CRUD over documents and orders.
pub struct PersistenceService<S> {
    slot: S,
    state: ServiceState,
}

impl<S: KeyValueStore> PersistenceService<S> {
    /// Creates an uninitialized service over `slot`. Nothing is read until
    /// [`PersistenceService::initialize`] or the first operation.
    pub fn new(slot: S) -> Self {
        PersistenceService {
            slot,
            state: ServiceState::Uninitialized,
        }
    }

    pub fn status(&self) -> ServiceStatus {
        match &self.state {
            ServiceState::Uninitialized => ServiceStatus::Uninitialized,
            ServiceState::Ready(_) => ServiceStatus::Ready,
            ServiceState::Failed(reason) => ServiceStatus::Failed {
                reason: reason.clone(),
            },
        }
    }

    /// Loads the snapshot from the slot, or creates an empty store if there is
    /// none. Idempotent once it has succeeded or failed.
    ///
    /// After loading, the current image is flushed once so the slot holds the
    /// current snapshot format. A failure of that flush is logged and left for
    /// the next mutation to report.
    pub fn initialize(&mut self) -> Result<(), StorageError> {
        match &self.state {
            ServiceState::Ready(_) => return Ok(()),
            ServiceState::Failed(reason) => {
                return Err(StorageError::Init {
                    reason: reason.clone(),
                })
            }
            ServiceState::Uninitialized => {}
        }

        match self.load() {
            Ok(store) => {
                self.state = ServiceState::Ready(store);
                if let Err(err) = self.flush() {
                    warn!(error = %err, "initial snapshot flush failed");
                }
                Ok(())
            }
            Err(err) => {
                let reason = match err {
                    StorageError::Init { reason } => reason,
                    other => other.to_string(),
                };
                tracing::error!(%reason, "storage initialization failed");
                self.state = ServiceState::Failed(reason.clone());
                Err(StorageError::Init { reason })
            }
        }
    }

    fn load(&self) -> Result<SqliteStore, StorageError> {
        let stored = self.slot.get(SNAPSHOT_KEY).map_err(|err| StorageError::Init {
            reason: format!("cannot read snapshot slot: {}", err),
        })?;

        match stored.filter(|text| !text.is_empty()) {
            Some(text) => {
                let format = SnapshotFormat::detect(&text)?;
                let bytes = snapshot::open(&text)?;
                let store = SqliteStore::from_snapshot(&bytes)?;
                info!(
                    format = format.as_str(),
                    bytes = bytes.len(),
                    "loaded snapshot"
                );
                Ok(store)
            }
            None => {
                info!("no snapshot found, starting with an empty store");
                SqliteStore::empty().map_err(|err| StorageError::Init {
                    reason: format!("cannot create store: {}", err),
                })
            }
        }
    }

    /// Returns the live store, initializing on first use.
    fn ready(&mut self) -> Result<&mut SqliteStore, StorageError> {
        self.initialize()?;
        match &mut self.state {
            ServiceState::Ready(store) => Ok(store),
            ServiceState::Failed(reason) => Err(StorageError::Init {
                reason: reason.clone(),
            }),
            ServiceState::Uninitialized => Err(StorageError::Init {
                reason: "service is not initialized".to_string(),
            }),
        }
    }

    /// Writes the full database image to the slot.
    ///
    /// Called after every mutation. Public so a caller that got
    /// [`StorageError::Durability`] can retry.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let bytes = self.ready()?.export_snapshot().map_err(not_durable)?;
        let sealed = snapshot::seal(&bytes);
        self.slot
            .set(SNAPSHOT_KEY, &sealed)
            .map_err(not_durable)?;
        debug!(bytes = sealed.len(), "snapshot flushed");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------

    /// Inserts a document and flushes.
    ///
    /// A duplicate ID fails with [`StorageError::DuplicateKey`] before anything
    /// is written. A flush failure returns [`StorageError::Durability`]; the
    /// document stays in memory.
    pub fn add_document(&mut self, doc: &DocumentRecord) -> Result<(), StorageError> {
        self.ready()?.insert_document(doc)?;
        debug!(id = %doc.id, name = %doc.name, "document added");
        self.flush()
    }

    pub fn get_document(&mut self, id: &DocumentId) -> Result<Option<DocumentRecord>, StorageError> {
        self.ready()?.get_document(id)
    }

    /// All documents, in insertion order.
    pub fn list_documents(&mut self) -> Result<Vec<DocumentRecord>, StorageError> {
        self.ready()?.list_documents()
    }

    /// Deletes a document if present, then flushes. A missing ID is not an
    /// error. Orders naming this document by file name are left as they are.
    pub fn delete_document(&mut self, id: &DocumentId) -> Result<(), StorageError> {
        let removed = self.ready()?.delete_document(id)?;
        debug!(id = %id, removed, "document delete");
        self.flush()
    }

    // -------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------

    /// Inserts a confirmed order and flushes. Same error contract as
    /// [`PersistenceService::add_document`].
    pub fn add_order(&mut self, order: &OrderRecord) -> Result<(), StorageError> {
        self.ready()?.insert_order(order)?;
        debug!(id = %order.id, items = order.items.len(), "order added");
        self.flush()
    }

    pub fn get_order(&mut self, id: &OrderId) -> Result<Option<OrderRecord>, StorageError> {
        self.ready()?.get_order(id)
    }

    /// All orders, in insertion order.
    pub fn list_orders(&mut self) -> Result<Vec<OrderRecord>, StorageError> {
        self.ready()?.list_orders()
    }
}

fn not_durable(err: StorageError) -> StorageError {
    warn!(error = %err, "snapshot flush failed");
    StorageError::Durability {
        reason: err.to_string(),
    }
}
