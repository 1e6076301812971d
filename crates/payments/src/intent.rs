//! Payment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quayside_orders::OrderId;

/// Payment intent identifier (generator-assigned, opaque).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    RequiresCapture,
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
}

/// A payment intent against one order.
///
/// `amount` equals the order's total at creation time (enforced before the
/// record exists); `currency` is inherited from the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentIntent {
    /// New snapshot with an updated status; intents are never mutated in
    /// place.
    pub fn with_status(&self, status: PaymentStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Input for intent creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIntent {
    pub order_id: OrderId,
    pub amount: f64,
    pub method: PaymentMethod,
    /// Capture immediately: the intent is `Succeeded` from the start.
    #[serde(default)]
    pub capture: bool,
}

/// Result of a capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOutcome {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub status: PaymentStatus,
}

/// Trusted, signature-verified inbound payment notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// Acknowledgement returned to the webhook sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookReceipt {
    pub received: bool,
}
