//! Read-side projection seam.
//!
//! The analytics/graph engine reads orders but does not participate in the
//! transactional lifecycle. It is wired in as an explicit two-variant
//! strategy selected once at startup; the disabled variant is a typed no-op,
//! not a swallowed failure.

use std::sync::Arc;

use crate::order::Order;

/// Observer notified after every persisted order snapshot.
pub trait ProjectOrders: Send + Sync {
    /// Fire-and-forget; a projection must never fail or stall the lifecycle.
    fn project_order(&self, order: &Order);
}

/// Projection capability chosen at wiring time.
#[derive(Clone)]
pub enum OrderProjection {
    Enabled(Arc<dyn ProjectOrders>),
    Disabled,
}

impl OrderProjection {
    pub fn apply(&self, order: &Order) {
        match self {
            Self::Enabled(projector) => projector.project_order(order),
            Self::Disabled => {}
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

impl core::fmt::Debug for OrderProjection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Enabled(_) => f.write_str("OrderProjection::Enabled"),
            Self::Disabled => f.write_str("OrderProjection::Disabled"),
        }
    }
}
