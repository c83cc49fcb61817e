//! Router assembly for the docvault HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS, body-limit and tracing middleware layers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/health", get(handlers::health::health))
        // Documents
        .route(
            "/documents",
            get(handlers::documents::list_documents)
                .post(handlers::documents::upload_document),
        )
        .route(
            "/documents/{id}",
            get(handlers::documents::get_document)
                .delete(handlers::documents::delete_document),
        )
        // Orders
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        // Assistant
        .route("/assistant/query", post(handlers::assistant::query))
        .route("/assistant/extract", post(handlers::assistant::extract))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
