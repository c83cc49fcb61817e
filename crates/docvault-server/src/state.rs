//! Application state with the shared `PersistenceService`.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. The mutex is what keeps mutations from interleaving: the
//! service itself assumes one caller at a time. Uses `tokio::sync::Mutex` so
//! handlers await the lock without blocking the runtime.

use std::sync::Arc;

use docvault_storage::{FileKeyValue, KeyValueStore, MemoryKeyValue, PersistenceService};

use crate::assistant::{Assistant, AssistantConfig};
use crate::config::ServerConfig;
use crate::error::ApiError;

/// Type-erased slot so tests and the binary share one state type.
pub type DynSlot = Box<dyn KeyValueStore + Send>;

/// The persistence service as held by the server.
pub type SharedService = PersistenceService<DynSlot>;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared persistence service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<SharedService>>,
    /// Model client, if an API key was configured.
    pub assistant: Option<Arc<Assistant>>,
    /// Request body limit; uploads carry whole files as base64.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Creates the state from config, with the snapshot slot stored under
    /// `config.data_dir`.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let slot = FileKeyValue::open(&config.data_dir)?;
        let mut state = Self::with_slot(Box::new(slot), config.assistant.clone());
        state.max_upload_bytes = config.max_upload_bytes;
        Ok(state)
    }

    /// Creates the state over a process-local slot (for testing).
    pub fn in_memory() -> Self {
        Self::with_slot(Box::new(MemoryKeyValue::new()), None)
    }

    /// Creates the state over any slot and initializes storage eagerly.
    ///
    /// An initialization failure is logged, not returned: the server still
    /// starts so `/health` can report it, and storage routes answer 503.
    pub fn with_slot(slot: DynSlot, assistant: Option<AssistantConfig>) -> Self {
        let mut service = PersistenceService::new(slot);
        match service.initialize() {
            Ok(()) => tracing::info!("storage ready"),
            Err(err) => tracing::error!(error = %err, "storage failed to initialize"),
        }

        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            assistant: assistant.map(|config| Arc::new(Assistant::new(config))),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Returns the assistant or a 503 explaining how to enable it.
    pub fn assistant(&self) -> Result<Arc<Assistant>, ApiError> {
        self.assistant.clone().ok_or_else(|| {
            ApiError::AssistantUnavailable(
                "no model API key configured; set GEMINI_API_KEY".to_string(),
            )
        })
    }
}
