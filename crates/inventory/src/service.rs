//! Inventory reservation workflow.

use std::sync::Arc;

use quayside_core::EngineResult;
use quayside_events::{EventKind, EventPublisher};
use quayside_orders::{OrderId, OrderService, OrderStatus};

use crate::item::{InventoryItem, ReservationLine, ReservationOutcome};
use crate::repository::InventoryRepository;

/// Reserves stock against an order and advances it to `Reserved`.
pub struct ReservationService {
    inventory: Arc<dyn InventoryRepository>,
    orders: Arc<OrderService>,
    publisher: Arc<EventPublisher>,
}

impl ReservationService {
    pub fn new(
        inventory: Arc<dyn InventoryRepository>,
        orders: Arc<OrderService>,
        publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            inventory,
            orders,
            publisher,
        }
    }

    /// All-or-nothing reservation.
    ///
    /// Fails with `NotFound` when the order does not exist. Any shortage is
    /// reported without touching inventory or order status; otherwise the
    /// stock is committed, the order moves to `Reserved`, and
    /// `inventory.reserved` is published.
    pub fn reserve(
        &self,
        order_id: &OrderId,
        lines: &[ReservationLine],
    ) -> EngineResult<ReservationOutcome> {
        let order = self.orders.get_order(order_id)?;

        let shortages = self.inventory.try_reserve(lines)?;
        if !shortages.is_empty() {
            tracing::info!(order_id = %order_id, shortages = shortages.len(), "reservation short");
            return Ok(ReservationOutcome {
                order_id: order_id.clone(),
                status: order.status,
                shortages,
            });
        }

        self.orders.update_status(order_id, OrderStatus::Reserved)?;
        tracing::info!(order_id = %order_id, "inventory reserved");
        self.publisher.emit(EventKind::InventoryReserved, {
            let mut payload = serde_json::Map::new();
            payload.insert("order_id".into(), serde_json::json!(order_id.as_str()));
            payload.insert(
                "status".into(),
                serde_json::json!(OrderStatus::Reserved.as_str()),
            );
            payload
        });

        Ok(ReservationOutcome {
            order_id: order_id.clone(),
            status: OrderStatus::Reserved,
            shortages: Vec::new(),
        })
    }

    /// Stock level for one sku; an unknown sku reads as zero available.
    pub fn get(&self, sku: &str) -> EngineResult<InventoryItem> {
        Ok(self.inventory.get(sku)?.unwrap_or_else(|| InventoryItem {
            sku: sku.to_owned(),
            available: 0,
        }))
    }

    /// All known stock levels.
    pub fn snapshot(&self) -> EngineResult<Vec<InventoryItem>> {
        self.inventory.list_all()
    }
}
