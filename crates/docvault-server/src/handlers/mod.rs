//! HTTP handler modules for the docvault API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`PersistenceService`], and return JSON
//! responses. No business logic lives in handlers.
//!
//! [`PersistenceService`]: docvault_storage::PersistenceService

pub mod assistant;
pub mod documents;
pub mod health;
pub mod orders;
