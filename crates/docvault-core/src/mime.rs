//! The closed set of accepted upload types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// MIME type of an uploaded document.
///
/// Only these three are accepted at intake; anything else is rejected before
/// it reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "application/pdf")]
    Pdf,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
            MimeType::Pdf => "application/pdf",
        }
    }

    /// Maps a file extension (without the dot, any case) to a MIME type.
    pub fn from_extension(ext: &str) -> Result<Self, CoreError> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(MimeType::Jpeg),
            "png" => Ok(MimeType::Png),
            "pdf" => Ok(MimeType::Pdf),
            other => Err(CoreError::UnsupportedMimeType {
                mime: format!(".{}", other),
            }),
        }
    }
}

impl FromStr for MimeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image/jpeg" => Ok(MimeType::Jpeg),
            "image/png" => Ok(MimeType::Png),
            "application/pdf" => Ok(MimeType::Pdf),
            other => Err(CoreError::UnsupportedMimeType {
                mime: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
