//! Domain types for docvault: uploaded documents and confirmed orders.
//!
//! This crate has no storage or network concerns. It defines the records the
//! persistence layer stores, the intake validation applied to uploads, and the
//! structured shape produced by receipt extraction.

pub mod document;
pub mod error;
pub mod id;
pub mod mime;
pub mod order;

// Re-export commonly used types
pub use document::DocumentRecord;
pub use error::CoreError;
pub use id::{DocumentId, OrderId};
pub use mime::MimeType;
pub use order::{ExtractedOrder, LineItem, OrderRecord};
