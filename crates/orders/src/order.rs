//! Order model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quayside_core::{EngineError, EngineResult};

/// Order identifier (generator-assigned, immutable, opaque).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Order status lifecycle. Monotonic: no transition moves status backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Reserved,
    Paid,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Created => 0,
            Self::Reserved => 1,
            Self::Paid => 2,
        }
    }

    /// Whether a transition to `next` keeps status monotonic.
    ///
    /// Re-applying the current status is allowed (idempotent capture);
    /// moving backward is not.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        next.rank() >= self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Reserved => "reserved",
            Self::Paid => "paid",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordered line: sku, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: String,
    pub qty: u32,
    pub unit_price: f64,
}

impl OrderLine {
    fn validate(&self) -> EngineResult<()> {
        if self.qty == 0 {
            return Err(EngineError::validation(format!(
                "line {}: qty must be positive",
                self.sku
            )));
        }
        if self.unit_price <= 0.0 {
            return Err(EngineError::validation(format!(
                "line {}: unit_price must be positive",
                self.sku
            )));
        }
        Ok(())
    }
}

/// Validated input for order creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: String,
    /// 3-letter currency code.
    pub currency: String,
    pub lines: Vec<OrderLine>,
    pub note: Option<String>,
}

impl NewOrder {
    pub fn validate(&self) -> EngineResult<()> {
        if self.currency.chars().count() != 3 {
            return Err(EngineError::validation("currency must be a 3-letter code"));
        }
        for line in &self.lines {
            line.validate()?;
        }
        Ok(())
    }
}

/// Immutable order snapshot.
///
/// `total` is computed once at creation and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: String,
    pub status: OrderStatus,
    pub currency: String,
    pub lines: Vec<OrderLine>,
    pub total: f64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// New snapshot with an updated status and timestamp; never mutates in
    /// place (shared snapshots may be held across threads).
    pub fn with_status(&self, status: OrderStatus, updated_at: DateTime<Utc>) -> Self {
        Self {
            status,
            updated_at,
            ..self.clone()
        }
    }
}

/// `Σ qty·unit_price`, rounded to 2 decimal places.
pub fn order_total(lines: &[OrderLine]) -> f64 {
    round2(
        lines
            .iter()
            .map(|line| f64::from(line.qty) * line.unit_price)
            .sum(),
    )
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Result of a creation attempt; `replayed` marks an idempotency-key hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderOutcome {
    pub order: Order,
    pub replayed: bool,
}

/// Snapshot of a status transition, returned by `mark_paid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub order_id: OrderId,
    pub status: OrderStatus,
}
