//! Document upload and listing request/response types.

use docvault_core::DocumentRecord;
use serde::{Deserialize, Serialize};

/// An upload as produced by the client's file picker.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadDocumentRequest {
    /// Original file name.
    pub name: String,
    /// MIME type as reported by the client.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Whole file, base64 encoded.
    #[serde(rename = "base64Content")]
    pub content: String,
}

/// Response for listing all documents.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentRecord>,
}
