//! In-memory repository implementations.
//!
//! Intended for tests/dev and single-process deployments. Not optimized for
//! performance; every method takes one lock, which also gives `try_reserve`
//! and the idempotency `set` their required atomicity.

use std::collections::HashMap;
use std::sync::RwLock;

use quayside_core::EngineResult;
use quayside_inventory::{InventoryItem, InventoryRepository, ReservationLine, Shortage};
use quayside_orders::{
    IdempotencyRecord, IdempotencyStore, Order, OrderId, OrderRepository, OrderStatus,
};
use quayside_payments::{PaymentId, PaymentIntent, PaymentRepository};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Order snapshots keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn add(&self, order: &Order) -> EngineResult<()> {
        self.orders
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(order.id.clone(), order.clone());
        Ok(())
    }

    fn get(&self, order_id: &OrderId) -> EngineResult<Option<Order>> {
        Ok(self
            .orders
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(order_id)
            .cloned())
    }

    fn list(&self, status: Option<OrderStatus>, limit: usize) -> EngineResult<Vec<Order>> {
        let orders = self.orders.read().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|order| status.is_none_or(|s| order.status == s))
            .cloned()
            .collect();
        matched.truncate(limit);
        Ok(matched)
    }

    fn update(&self, order: &Order) -> EngineResult<()> {
        self.add(order)
    }

    fn count(&self) -> EngineResult<usize> {
        Ok(self.orders.read().unwrap_or_else(|e| e.into_inner()).len())
    }

    fn total_revenue(&self) -> EngineResult<f64> {
        let orders = self.orders.read().unwrap_or_else(|e| e.into_inner());
        Ok(round2(orders.values().map(|order| order.total).sum()))
    }

    fn paid_count(&self) -> EngineResult<usize> {
        let orders = self.orders.read().unwrap_or_else(|e| e.into_inner());
        Ok(orders
            .values()
            .filter(|order| order.status == OrderStatus::Paid)
            .count())
    }
}

/// Payment intents keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryPaymentRepository {
    payments: RwLock<HashMap<PaymentId, PaymentIntent>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaymentRepository for InMemoryPaymentRepository {
    fn add(&self, payment: &PaymentIntent) -> EngineResult<()> {
        self.payments
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(payment.id.clone(), payment.clone());
        Ok(())
    }

    fn get(&self, payment_id: &PaymentId) -> EngineResult<Option<PaymentIntent>> {
        Ok(self
            .payments
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(payment_id)
            .cloned())
    }

    fn list_by_order(&self, order_id: &OrderId) -> EngineResult<Vec<PaymentIntent>> {
        let payments = self.payments.read().unwrap_or_else(|e| e.into_inner());
        Ok(payments
            .values()
            .filter(|payment| payment.order_id == *order_id)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> EngineResult<Vec<PaymentIntent>> {
        let payments = self.payments.read().unwrap_or_else(|e| e.into_inner());
        Ok(payments.values().cloned().collect())
    }

    fn update(&self, payment: &PaymentIntent) -> EngineResult<()> {
        self.add(payment)
    }
}

/// Available stock keyed by sku.
#[derive(Debug, Default)]
pub struct InMemoryInventoryRepository {
    stock: RwLock<HashMap<String, u32>>,
}

impl InMemoryInventoryRepository {
    pub fn new(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        Self {
            stock: RwLock::new(
                items
                    .into_iter()
                    .map(|item| (item.sku, item.available))
                    .collect(),
            ),
        }
    }
}

impl InventoryRepository for InMemoryInventoryRepository {
    fn get(&self, sku: &str) -> EngineResult<Option<InventoryItem>> {
        Ok(self
            .stock
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(sku)
            .map(|available| InventoryItem {
                sku: sku.to_owned(),
                available: *available,
            }))
    }

    fn list_all(&self) -> EngineResult<Vec<InventoryItem>> {
        let stock = self.stock.read().unwrap_or_else(|e| e.into_inner());
        Ok(stock
            .iter()
            .map(|(sku, available)| InventoryItem {
                sku: sku.clone(),
                available: *available,
            })
            .collect())
    }

    fn try_reserve(&self, lines: &[ReservationLine]) -> EngineResult<Vec<Shortage>> {
        // One write guard spans check and commit: two reservations racing
        // for the last unit cannot both pass the shortage check.
        let mut stock = self.stock.write().unwrap_or_else(|e| e.into_inner());

        let shortages: Vec<Shortage> = lines
            .iter()
            .filter_map(|line| {
                let available = stock.get(&line.sku).copied().unwrap_or(0);
                (available < line.qty).then(|| Shortage {
                    sku: line.sku.clone(),
                    available,
                    requested: line.qty,
                })
            })
            .collect();
        if !shortages.is_empty() {
            return Ok(shortages);
        }

        for line in lines {
            let available = stock.entry(line.sku.clone()).or_insert(0);
            *available = available.saturating_sub(line.qty);
        }
        Ok(Vec::new())
    }
}

/// Idempotency records keyed by the caller-supplied key.
#[derive(Debug, Default)]
pub struct InMemoryIdempotencyStore {
    records: RwLock<HashMap<String, IdempotencyRecord>>,
}

impl InMemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdempotencyStore for InMemoryIdempotencyStore {
    fn get(&self, key: &str) -> EngineResult<Option<IdempotencyRecord>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&self, record: IdempotencyRecord) -> EngineResult<()> {
        // First writer wins: a key is never overwritten once bound.
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(record.key.clone())
            .or_insert(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    fn order(id: &str, status: OrderStatus, total: f64) -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::new(id),
            customer_id: "cust-1".into(),
            status,
            currency: "USD".into(),
            lines: vec![],
            total,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(sku: &str, available: u32) -> InventoryItem {
        InventoryItem {
            sku: sku.into(),
            available,
        }
    }

    fn line(sku: &str, qty: u32) -> ReservationLine {
        ReservationLine {
            sku: sku.into(),
            qty,
        }
    }

    #[test]
    fn order_aggregates_cover_count_revenue_and_paid() {
        let repo = InMemoryOrderRepository::new();
        repo.add(&order("a", OrderStatus::Created, 10.004)).unwrap();
        repo.add(&order("b", OrderStatus::Paid, 20.004)).unwrap();
        repo.add(&order("c", OrderStatus::Paid, 5.0)).unwrap();

        assert_eq!(repo.count().unwrap(), 3);
        assert_eq!(repo.paid_count().unwrap(), 2);
        assert_eq!(repo.total_revenue().unwrap(), 35.01);
    }

    #[test]
    fn order_list_filters_and_truncates() {
        let repo = InMemoryOrderRepository::new();
        for id in ["a", "b", "c"] {
            repo.add(&order(id, OrderStatus::Created, 1.0)).unwrap();
        }
        repo.add(&order("d", OrderStatus::Paid, 1.0)).unwrap();

        assert_eq!(repo.list(Some(OrderStatus::Created), 10).unwrap().len(), 3);
        assert_eq!(repo.list(Some(OrderStatus::Paid), 10).unwrap().len(), 1);
        assert_eq!(repo.list(None, 2).unwrap().len(), 2);
    }

    #[test]
    fn shortage_reported_without_mutation() {
        let repo = InMemoryInventoryRepository::new([item("a", 5), item("b", 1)]);
        let shortages = repo
            .try_reserve(&[line("a", 2), line("b", 3), line("ghost", 1)])
            .unwrap();

        assert_eq!(
            shortages,
            vec![
                Shortage {
                    sku: "b".into(),
                    available: 1,
                    requested: 3,
                },
                Shortage {
                    sku: "ghost".into(),
                    available: 0,
                    requested: 1,
                },
            ]
        );
        // Nothing moved, including the line that had enough stock.
        assert_eq!(repo.get("a").unwrap().unwrap().available, 5);
        assert_eq!(repo.get("b").unwrap().unwrap().available, 1);
    }

    #[test]
    fn successful_reserve_decrements_with_a_zero_floor() {
        let repo = InMemoryInventoryRepository::new([item("a", 5)]);
        assert!(repo.try_reserve(&[line("a", 5)]).unwrap().is_empty());
        assert_eq!(repo.get("a").unwrap().unwrap().available, 0);
    }

    #[test]
    fn racing_reservations_never_double_spend_the_last_unit() {
        let repo = Arc::new(InMemoryInventoryRepository::new([item("a", 1)]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || repo.try_reserve(&[line("a", 1)]).unwrap().is_empty())
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&won| won)
            .count();

        assert_eq!(wins, 1);
        assert_eq!(repo.get("a").unwrap().unwrap().available, 0);
    }

    #[test]
    fn idempotency_store_keeps_the_first_record() {
        let store = InMemoryIdempotencyStore::new();
        store
            .set(IdempotencyRecord {
                key: "k".into(),
                order: order("first", OrderStatus::Created, 1.0),
            })
            .unwrap();
        store
            .set(IdempotencyRecord {
                key: "k".into(),
                order: order("second", OrderStatus::Created, 1.0),
            })
            .unwrap();

        let record = store.get("k").unwrap().unwrap();
        assert_eq!(record.order.id, OrderId::new("first"));
    }

    #[test]
    fn payments_list_by_order_filters() {
        let repo = InMemoryPaymentRepository::new();
        let now = Utc::now();
        for (id, order_id) in [("p1", "o1"), ("p2", "o1"), ("p3", "o2")] {
            repo.add(&PaymentIntent {
                id: PaymentId::new(id),
                order_id: OrderId::new(order_id),
                amount: 10.0,
                currency: "USD".into(),
                status: quayside_payments::PaymentStatus::RequiresCapture,
                created_at: now,
            })
            .unwrap();
        }

        assert_eq!(repo.list_by_order(&OrderId::new("o1")).unwrap().len(), 2);
        assert_eq!(repo.list_all().unwrap().len(), 3);
    }
}
