//! Inventory model.

use serde::{Deserialize, Serialize};

use quayside_orders::{OrderId, OrderLine, OrderStatus};

/// Available quantity for one sku. Never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub sku: String,
    pub available: u32,
}

/// One requested decrement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationLine {
    pub sku: String,
    pub qty: u32,
}

impl From<&OrderLine> for ReservationLine {
    fn from(line: &OrderLine) -> Self {
        Self {
            sku: line.sku.clone(),
            qty: line.qty,
        }
    }
}

/// Gap between requested and available quantity for a sku.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortage {
    pub sku: String,
    pub available: u32,
    pub requested: u32,
}

/// Result of a reservation attempt.
///
/// Empty `shortages` means the stock was committed and the order advanced to
/// `Reserved`; otherwise nothing was mutated and `status` is the order's
/// unchanged status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationOutcome {
    pub order_id: OrderId,
    pub status: OrderStatus,
    #[serde(default)]
    pub shortages: Vec<Shortage>,
}
