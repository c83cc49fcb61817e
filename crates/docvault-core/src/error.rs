//! Core error types for docvault-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! intake checks applied before a record ever reaches storage.

use thiserror::Error;

/// Core errors produced by the docvault-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The upload's MIME type is not one of the accepted types.
    #[error("unsupported file type '{mime}': only image/jpeg, image/png and application/pdf are accepted")]
    UnsupportedMimeType { mime: String },

    /// The payload is not valid base64 text.
    #[error("invalid content: {reason}")]
    InvalidContent { reason: String },

    /// A required field was empty.
    #[error("field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// An amount was NaN or infinite.
    #[error("field '{field}' must be a finite number")]
    NonFiniteNumber { field: String },
}
