//! Order confirmation and listing types.

use docvault_core::{ExtractedOrder, OrderRecord};
use serde::{Deserialize, Serialize};

/// A reviewed extraction the user wants to keep.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    pub order: ExtractedOrder,
    /// File name of the receipt the order was read from.
    #[serde(default)]
    pub receipt_file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderRecord>,
}
