//! Health endpoint response.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "uninitialized", "ready" or "failed".
    pub storage: &'static str,
    /// Initialization error when `storage` is "failed".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub assistant_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
