//! Document handlers (upload, list, get, delete).

use axum::extract::{Path, State};
use axum::Json;

use docvault_core::{DocumentId, DocumentRecord};

use crate::error::ApiError;
use crate::schema::documents::{DocumentListResponse, UploadDocumentRequest};
use crate::state::AppState;

/// Lists all documents.
///
/// `GET /documents`
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<DocumentListResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let documents = service.list_documents()?;
    Ok(Json(DocumentListResponse { documents }))
}

/// Validates an upload, assigns its ID and stores it.
///
/// `POST /documents`
pub async fn upload_document(
    State(state): State<AppState>,
    Json(req): Json<UploadDocumentRequest>,
) -> Result<Json<DocumentRecord>, ApiError> {
    let doc = DocumentRecord::from_upload(&req.name, &req.mime_type, &req.content)?;
    let mut service = state.service.lock().await;
    service.add_document(&doc)?;
    tracing::info!(id = %doc.id, mime = %doc.mime_type, "document uploaded");
    Ok(Json(doc))
}

/// Returns one document.
///
/// `GET /documents/{id}`
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentRecord>, ApiError> {
    let mut service = state.service.lock().await;
    service
        .get_document(&DocumentId(id.clone()))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("document {}", id)))
}

/// Deletes a document. Deleting an unknown ID succeeds.
///
/// `DELETE /documents/{id}`
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_document(&DocumentId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
