//! Order handlers (confirm, list).

use axum::extract::State;
use axum::Json;

use docvault_core::OrderRecord;

use crate::error::ApiError;
use crate::schema::orders::{CreateOrderRequest, OrderListResponse};
use crate::state::AppState;

/// Lists confirmed orders.
///
/// `GET /orders`
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let orders = service.list_orders()?;
    Ok(Json(OrderListResponse { orders }))
}

/// Stores a reviewed extraction as an order with a new ID.
///
/// `POST /orders`
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<OrderRecord>, ApiError> {
    let order = req.order.confirm(req.receipt_file_name);
    let mut service = state.service.lock().await;
    service.add_order(&order)?;
    tracing::info!(id = %order.id, items = order.items.len(), "order saved");
    Ok(Json(order))
}
