//! AI assistant handlers.
//!
//! The service lock is held only while documents are read; it is released
//! before the model call so slow requests do not block storage.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::assistant::{ExtractRequest, ExtractResponse, QueryRequest, QueryResponse};
use crate::state::AppState;

/// Answers a question over the selected (default: all) documents.
///
/// `POST /assistant/query`
pub async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".to_string()));
    }
    let assistant = state.assistant()?;

    let documents = {
        let mut service = state.service.lock().await;
        match &req.document_ids {
            None => service.list_documents()?,
            Some(ids) => {
                let mut selected = Vec::with_capacity(ids.len());
                for id in ids {
                    let doc = service
                        .get_document(id)?
                        .ok_or_else(|| ApiError::NotFound(format!("document {}", id)))?;
                    selected.push(doc);
                }
                selected
            }
        }
    };
    if documents.is_empty() {
        return Err(ApiError::BadRequest(
            "upload at least one document before asking a question".to_string(),
        ));
    }

    let answer = assistant.answer(question, &documents).await?;
    Ok(Json(QueryResponse {
        answer,
        document_count: documents.len(),
    }))
}

/// Extracts order data from a stored receipt without saving it.
///
/// `POST /assistant/extract`
pub async fn extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let assistant = state.assistant()?;
    let document = {
        let mut service = state.service.lock().await;
        service
            .get_document(&req.document_id)?
            .ok_or_else(|| ApiError::NotFound(format!("document {}", req.document_id)))?
    };

    let order = assistant.extract_order(&document).await?;
    Ok(Json(ExtractResponse {
        order,
        receipt_file_name: document.name,
    }))
}
