//! Order aggregates for dashboards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quayside_core::{Clock, EngineResult};
use quayside_orders::OrderRepository;

/// Point-in-time order aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub paid_orders: usize,
    pub generated_at: DateTime<Utc>,
}

/// Read-only reporting over the order repository's aggregate queries.
pub struct MetricsService {
    orders: Arc<dyn OrderRepository>,
    clock: Arc<dyn Clock>,
}

impl MetricsService {
    pub fn new(orders: Arc<dyn OrderRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { orders, clock }
    }

    pub fn snapshot(&self) -> EngineResult<MetricsSnapshot> {
        Ok(MetricsSnapshot {
            total_orders: self.orders.count()?,
            total_revenue: self.orders.total_revenue()?,
            paid_orders: self.orders.paid_count()?,
            generated_at: self.clock.now(),
        })
    }
}
