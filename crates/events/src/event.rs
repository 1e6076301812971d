//! Domain event messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four event types the engine publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "order.created")]
    OrderCreated,
    #[serde(rename = "inventory.reserved")]
    InventoryReserved,
    #[serde(rename = "payment.intent_created")]
    PaymentIntentCreated,
    #[serde(rename = "payment.succeeded")]
    PaymentSucceeded,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order.created",
            Self::InventoryReserved => "inventory.reserved",
            Self::PaymentIntentCreated => "payment.intent_created",
            Self::PaymentSucceeded => "payment.succeeded",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fact published after a state-changing operation.
///
/// Events are immutable, append-only, and fire-and-forget; no replay log is
/// retained by the engine itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub payload: serde_json::Map<String, serde_json::Value>,
}
