//! Orders extracted from receipts.
//!
//! Extraction produces an [`ExtractedOrder`] with every field optional. The
//! user reviews it, and confirming turns it into an [`OrderRecord`] with an
//! assigned ID. Only confirmed orders are stored.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::OrderId;

/// One line of a receipt.
///
/// Quantity and price are optional: receipts that were typed in by hand can
/// leave them blank, and those blanks are stored as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// A confirmed order.
///
/// `receipt_file_name` names the document the order came from. It is a soft
/// reference: deleting that document leaves the order untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_file_name: Option<String>,
}

impl OrderRecord {
    /// Rejects NaN and infinite amounts. JSON has no encoding for them, so
    /// they would come back from storage as something else.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_finite("total", self.total)?;
        for (index, item) in self.items.iter().enumerate() {
            check_finite(&format!("items[{}].quantity", index), item.quantity)?;
            check_finite(&format!("items[{}].price", index), item.price)?;
        }
        Ok(())
    }
}

fn check_finite(field: &str, value: Option<f64>) -> Result<(), CoreError> {
    match value {
        Some(v) if !v.is_finite() => Err(CoreError::NonFiniteNumber {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Structured data pulled out of a receipt, before user confirmation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
}

impl ExtractedOrder {
    /// Accepts the extraction as an order with a freshly generated ID.
    pub fn confirm(self, receipt_file_name: Option<String>) -> OrderRecord {
        OrderRecord {
            id: OrderId::generate(),
            order_number: self.order_number,
            order_date: self.date,
            customer: self.customer,
            total: self.total,
            items: self.items.unwrap_or_default(),
            receipt_file_name,
        }
    }
}
