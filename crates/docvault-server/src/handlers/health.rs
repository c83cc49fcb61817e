//! Health handler.

use axum::extract::State;
use axum::Json;

use docvault_storage::ServiceStatus;

use crate::schema::health::HealthResponse;
use crate::state::AppState;

/// Reports storage lifecycle state and assistant availability.
///
/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.service.lock().await.status();
    let (storage, reason) = match status {
        ServiceStatus::Uninitialized => ("uninitialized", None),
        ServiceStatus::Ready => ("ready", None),
        ServiceStatus::Failed { reason } => ("failed", Some(reason)),
    };
    Json(HealthResponse {
        storage,
        reason,
        assistant_configured: state.assistant.is_some(),
        model: state.assistant.as_ref().map(|a| a.model().to_string()),
    })
}
