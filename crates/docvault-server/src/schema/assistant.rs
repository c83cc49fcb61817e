//! Request/response types for the AI assistant endpoints.

use docvault_core::{DocumentId, ExtractedOrder};
use serde::{Deserialize, Serialize};

/// A free-form question over stored documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub question: String,
    /// Restricts the question to these documents; all documents when absent.
    #[serde(default)]
    pub document_ids: Option<Vec<DocumentId>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub answer: String,
    /// How many documents were sent with the question.
    pub document_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub document_id: DocumentId,
}

/// Extraction result, not yet stored. Confirm it with `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub order: ExtractedOrder,
    pub receipt_file_name: String,
}
