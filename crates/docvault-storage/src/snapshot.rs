//! Versioned envelope around the encoded snapshot.
//!
//! # Formats
//!
//! - **Legacy**: bare base64 of the database image, no marker. Written by
//!   earlier releases and still accepted on load.
//! - **V1**: `v1:<blake3 hex>:<base64>`. The checksum covers the decoded
//!   database bytes, so a truncated or edited slot fails at load instead of
//!   surfacing later as a confusing SQLite error.
//!
//! The base64 alphabet has no `:`, so a value containing one always carries a
//! version marker. Writes always produce the current format.

use crate::codec;
use crate::error::StorageError;

const V1_PREFIX: &str = "v1:";

/// Format of a stored snapshot value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Legacy,
    V1,
}

impl SnapshotFormat {
    /// Detects the format without decoding the payload.
    pub fn detect(text: &str) -> Result<Self, StorageError> {
        if text.starts_with(V1_PREFIX) {
            return Ok(SnapshotFormat::V1);
        }
        match text.split_once(':') {
            None => Ok(SnapshotFormat::Legacy),
            Some((marker, _)) => Err(StorageError::Init {
                reason: format!("unsupported snapshot version marker '{}'", marker),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotFormat::Legacy => "legacy",
            SnapshotFormat::V1 => "v1",
        }
    }
}

/// Wraps database bytes in the current envelope.
pub fn seal(bytes: &[u8]) -> String {
    let checksum = blake3::hash(bytes);
    format!("{}{}:{}", V1_PREFIX, checksum.to_hex(), codec::encode(bytes))
}

/// Recovers database bytes from either format.
///
/// Any failure here means the slot does not hold a usable snapshot and is
/// reported as [`StorageError::Init`].
pub fn open(text: &str) -> Result<Vec<u8>, StorageError> {
    match SnapshotFormat::detect(text)? {
        SnapshotFormat::Legacy => codec::decode(text).map_err(|err| StorageError::Init {
            reason: format!("corrupt legacy snapshot: {}", err),
        }),
        SnapshotFormat::V1 => {
            let rest = &text[V1_PREFIX.len()..];
            let (expected, payload) = rest.split_once(':').ok_or_else(|| StorageError::Init {
                reason: "v1 snapshot is missing its checksum".to_string(),
            })?;
            let bytes = codec::decode(payload).map_err(|err| StorageError::Init {
                reason: format!("corrupt v1 snapshot: {}", err),
            })?;
            let actual = blake3::hash(&bytes).to_hex();
            if actual.as_str() != expected {
                return Err(StorageError::Init {
                    reason: format!(
                        "snapshot checksum mismatch: expected {}, found {}",
                        expected, actual
                    ),
                });
            }
            Ok(bytes)
        }
    }
}
