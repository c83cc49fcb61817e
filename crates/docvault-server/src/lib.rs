//! HTTP/JSON API for docvault: upload documents, ask questions about them,
//! and turn receipts into stored orders.
//!
//! This crate contains the server framework, API schema types, error
//! handling, the model client and route definitions. Storage lives in
//! `docvault-storage`.

pub mod assistant;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
