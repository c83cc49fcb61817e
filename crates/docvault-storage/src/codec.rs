//! Text encoding for binary snapshots.
//!
//! The key-value slot only holds strings, so snapshot bytes go through
//! standard padded base64. Whole-blob only: no chunking, no compression.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::StorageError;

/// Encodes bytes as base64 text.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes base64 text produced by [`encode`].
pub fn decode(text: &str) -> Result<Vec<u8>, StorageError> {
    STANDARD
        .decode(text.as_bytes())
        .map_err(|err| StorageError::Decode {
            reason: err.to_string(),
        })
}
