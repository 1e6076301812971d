//! Order orchestrator.

use std::sync::Arc;

use quayside_core::{Clock, EngineError, EngineResult, IdGenerator, StripedLock};
use quayside_events::{EventKind, EventPublisher};

use crate::order::{CreateOrderOutcome, NewOrder, Order, OrderId, OrderStatus, StatusUpdate, order_total};
use crate::projection::OrderProjection;
use crate::repository::{IdempotencyRecord, IdempotencyStore, OrderRepository};

/// Builds, persists, and transitions orders; owns idempotency-key
/// deduplication.
///
/// Concurrency guards:
/// - creation check-and-set is serialized per idempotency key, so two
///   concurrent requests bearing the same key cannot both produce orders
/// - status transitions are serialized per order id and re-read the current
///   snapshot inside the lock, so out-of-order writes can never revert
///   progress
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    idempotency: Arc<dyn IdempotencyStore>,
    publisher: Arc<EventPublisher>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    projection: OrderProjection,
    key_locks: StripedLock,
    order_locks: StripedLock,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        idempotency: Arc<dyn IdempotencyStore>,
        publisher: Arc<EventPublisher>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        projection: OrderProjection,
    ) -> Self {
        Self {
            orders,
            idempotency,
            publisher,
            clock,
            ids,
            projection,
            key_locks: StripedLock::default(),
            order_locks: StripedLock::default(),
        }
    }

    /// Create an order, or replay the one a previous request with the same
    /// idempotency key produced.
    ///
    /// The replay path writes nothing and publishes nothing; it is the
    /// exactly-once guarantee against client retries, not an error. The
    /// idempotency record is bound strictly after persistence: a crash in
    /// between costs at most a harmless duplicate order on retry, never a
    /// key pointing at a lost order.
    pub fn create_order(
        &self,
        draft: NewOrder,
        idempotency_key: Option<&str>,
    ) -> EngineResult<CreateOrderOutcome> {
        draft.validate()?;

        let order = match idempotency_key {
            Some(key) => {
                let _guard = self.key_locks.lock(key);
                if let Some(record) = self.idempotency.get(key)? {
                    tracing::debug!(key, order_id = %record.order.id, "idempotency replay");
                    return Ok(CreateOrderOutcome {
                        order: record.order,
                        replayed: true,
                    });
                }
                let order = self.build_order(draft);
                self.orders.add(&order)?;
                self.projection.apply(&order);
                self.idempotency.set(IdempotencyRecord {
                    key: key.to_owned(),
                    order: order.clone(),
                })?;
                order
            }
            None => {
                let order = self.build_order(draft);
                self.orders.add(&order)?;
                self.projection.apply(&order);
                order
            }
        };

        tracing::info!(order_id = %order.id, total = order.total, "order created");
        self.publisher.emit(
            EventKind::OrderCreated,
            payload(&[
                ("order_id", serde_json::json!(order.id.as_str())),
                ("status", serde_json::json!(order.status.as_str())),
            ]),
        );
        Ok(CreateOrderOutcome {
            order,
            replayed: false,
        })
    }

    pub fn get_order(&self, order_id: &OrderId) -> EngineResult<Order> {
        self.orders.get(order_id)?.ok_or(EngineError::NotFound)
    }

    pub fn list_orders(&self, status: Option<OrderStatus>, limit: usize) -> EngineResult<Vec<Order>> {
        self.orders.list(status, limit)
    }

    /// Transition an order, serialized per order id.
    ///
    /// The current snapshot is re-read inside the lock; a transition that
    /// would move status backward is ignored and the stored snapshot is
    /// returned unchanged. Only the reservation and payment workflows call
    /// this (the orchestrator itself goes through [`Self::mark_paid`]).
    pub fn update_status(&self, order_id: &OrderId, status: OrderStatus) -> EngineResult<Order> {
        let _guard = self.order_locks.lock(order_id.as_str());
        let current = self.orders.get(order_id)?.ok_or(EngineError::NotFound)?;

        if !current.status.can_advance_to(status) {
            tracing::debug!(
                order_id = %order_id,
                from = %current.status,
                to = %status,
                "ignoring backward status transition"
            );
            return Ok(current);
        }

        let updated = current.with_status(status, self.clock.now());
        self.orders.update(&updated)?;
        self.projection.apply(&updated);
        Ok(updated)
    }

    /// Transition an order to `Paid` and publish `payment.succeeded`.
    ///
    /// A missing order skips the status write but still publishes the event:
    /// webhook deliveries may arrive out of order or duplicated, and the
    /// notification stream must reflect them either way.
    pub fn mark_paid(&self, order_id: &OrderId, payment_id: &str) -> EngineResult<StatusUpdate> {
        match self.update_status(order_id, OrderStatus::Paid) {
            Ok(_) => {}
            Err(EngineError::NotFound) => {
                tracing::warn!(order_id = %order_id, payment_id, "mark_paid for unknown order");
            }
            Err(err) => return Err(err),
        }

        self.publisher.emit(
            EventKind::PaymentSucceeded,
            payload(&[
                ("order_id", serde_json::json!(order_id.as_str())),
                ("payment_id", serde_json::json!(payment_id)),
            ]),
        );
        Ok(StatusUpdate {
            order_id: order_id.clone(),
            status: OrderStatus::Paid,
        })
    }

    fn build_order(&self, draft: NewOrder) -> Order {
        let now = self.clock.now();
        Order {
            id: OrderId::new(self.ids.next_id()),
            customer_id: draft.customer_id,
            status: OrderStatus::Created,
            currency: draft.currency,
            total: order_total(&draft.lines),
            lines: draft.lines,
            note: draft.note,
            created_at: now,
            updated_at: now,
        }
    }
}

fn payload(entries: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderLine;
    use chrono::Utc;
    use quayside_core::{ManualClock, SequenceGenerator};
    use quayside_events::EventBus;
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Default)]
    struct MapOrders(RwLock<HashMap<OrderId, Order>>);

    impl OrderRepository for MapOrders {
        fn add(&self, order: &Order) -> EngineResult<()> {
            self.0.write().unwrap().insert(order.id.clone(), order.clone());
            Ok(())
        }

        fn get(&self, order_id: &OrderId) -> EngineResult<Option<Order>> {
            Ok(self.0.read().unwrap().get(order_id).cloned())
        }

        fn list(&self, status: Option<OrderStatus>, limit: usize) -> EngineResult<Vec<Order>> {
            let mut orders: Vec<Order> = self
                .0
                .read()
                .unwrap()
                .values()
                .filter(|order| status.is_none_or(|s| order.status == s))
                .cloned()
                .collect();
            orders.truncate(limit);
            Ok(orders)
        }

        fn update(&self, order: &Order) -> EngineResult<()> {
            self.add(order)
        }

        fn count(&self) -> EngineResult<usize> {
            Ok(self.0.read().unwrap().len())
        }

        fn total_revenue(&self) -> EngineResult<f64> {
            Ok(self.0.read().unwrap().values().map(|o| o.total).sum())
        }

        fn paid_count(&self) -> EngineResult<usize> {
            Ok(self
                .0
                .read()
                .unwrap()
                .values()
                .filter(|o| o.status == OrderStatus::Paid)
                .count())
        }
    }

    #[derive(Default)]
    struct MapKeys(RwLock<HashMap<String, IdempotencyRecord>>);

    impl IdempotencyStore for MapKeys {
        fn get(&self, key: &str) -> EngineResult<Option<IdempotencyRecord>> {
            Ok(self.0.read().unwrap().get(key).cloned())
        }

        fn set(&self, record: IdempotencyRecord) -> EngineResult<()> {
            self.0
                .write()
                .unwrap()
                .entry(record.key.clone())
                .or_insert(record);
            Ok(())
        }
    }

    struct Harness {
        service: OrderService,
        bus: Arc<EventBus>,
    }

    fn harness() -> Harness {
        let bus = Arc::new(EventBus::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let ids = Arc::new(SequenceGenerator::new("ord"));
        let publisher = Arc::new(EventPublisher::new(
            Arc::clone(&bus),
            clock.clone() as Arc<dyn Clock>,
            ids.clone() as Arc<dyn IdGenerator>,
        ));
        let service = OrderService::new(
            Arc::new(MapOrders::default()),
            Arc::new(MapKeys::default()),
            publisher,
            clock,
            ids,
            OrderProjection::Disabled,
        );
        Harness { service, bus }
    }

    fn draft() -> NewOrder {
        NewOrder {
            customer_id: "cust-1".into(),
            currency: "USD".into(),
            lines: vec![
                OrderLine {
                    sku: "sku-a".into(),
                    qty: 2,
                    unit_price: 10.0,
                },
                OrderLine {
                    sku: "sku-b".into(),
                    qty: 3,
                    unit_price: 5.0,
                },
            ],
            note: None,
        }
    }

    #[test]
    fn creates_order_with_computed_total_and_created_status() {
        let h = harness();
        let outcome = h.service.create_order(draft(), None).unwrap();
        assert_eq!(outcome.order.total, 35.0);
        assert_eq!(outcome.order.status, OrderStatus::Created);
        assert!(!outcome.replayed);
    }

    #[test]
    fn publishes_order_created_event() {
        let h = harness();
        let sub = h.bus.subscribe();
        let outcome = h.service.create_order(draft(), None).unwrap();

        let event = sub.try_recv().unwrap();
        assert_eq!(event.kind, EventKind::OrderCreated);
        assert_eq!(event.payload["order_id"], outcome.order.id.as_str());
        assert_eq!(event.payload["status"], "created");
    }

    #[test]
    fn same_key_replays_the_stored_order() {
        let h = harness();
        let first = h.service.create_order(draft(), Some("key-1")).unwrap();
        let second = h.service.create_order(draft(), Some("key-1")).unwrap();

        assert_eq!(first.order.id, second.order.id);
        assert!(!first.replayed);
        assert!(second.replayed);
    }

    #[test]
    fn replay_publishes_no_event_and_writes_nothing() {
        let h = harness();
        h.service.create_order(draft(), Some("key-1")).unwrap();

        let sub = h.bus.subscribe();
        h.service.create_order(draft(), Some("key-1")).unwrap();
        assert!(sub.try_recv().is_err());
        assert_eq!(h.service.list_orders(None, 10).unwrap().len(), 1);
    }

    #[test]
    fn distinct_keys_produce_distinct_orders() {
        let h = harness();
        let first = h.service.create_order(draft(), Some("key-1")).unwrap();
        let second = h.service.create_order(draft(), Some("key-2")).unwrap();
        assert_ne!(first.order.id, second.order.id);
    }

    #[test]
    fn invalid_draft_is_rejected_before_any_write() {
        let h = harness();
        let mut bad = draft();
        bad.lines[0].qty = 0;
        let err = h.service.create_order(bad, Some("key-1")).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(h.service.list_orders(None, 10).unwrap().len(), 0);
    }

    #[test]
    fn get_order_fails_with_not_found() {
        let h = harness();
        let err = h.service.get_order(&OrderId::new("missing")).unwrap_err();
        assert_eq!(err, EngineError::NotFound);
    }

    #[test]
    fn list_orders_filters_by_status_and_limits() {
        let h = harness();
        for _ in 0..3 {
            h.service.create_order(draft(), None).unwrap();
        }
        let paid_id = h.service.create_order(draft(), None).unwrap().order.id;
        h.service.update_status(&paid_id, OrderStatus::Paid).unwrap();

        let created = h
            .service
            .list_orders(Some(OrderStatus::Created), 10)
            .unwrap();
        assert_eq!(created.len(), 3);
        assert_eq!(h.service.list_orders(None, 2).unwrap().len(), 2);
    }

    #[test]
    fn update_status_ignores_backward_transitions() {
        let h = harness();
        let id = h.service.create_order(draft(), None).unwrap().order.id;

        h.service.update_status(&id, OrderStatus::Paid).unwrap();
        let after = h.service.update_status(&id, OrderStatus::Reserved).unwrap();

        assert_eq!(after.status, OrderStatus::Paid);
        assert_eq!(h.service.get_order(&id).unwrap().status, OrderStatus::Paid);
    }

    #[test]
    fn update_status_bumps_updated_at_only() {
        let h = harness();
        let order = h.service.create_order(draft(), None).unwrap().order;
        let updated = h
            .service
            .update_status(&order.id, OrderStatus::Reserved)
            .unwrap();
        assert_eq!(updated.created_at, order.created_at);
        assert_eq!(updated.total, order.total);
    }

    #[test]
    fn mark_paid_transitions_and_publishes() {
        let h = harness();
        let id = h.service.create_order(draft(), None).unwrap().order.id;
        let sub = h.bus.subscribe();

        let update = h.service.mark_paid(&id, "pay-1").unwrap();
        assert_eq!(update.status, OrderStatus::Paid);
        assert_eq!(h.service.get_order(&id).unwrap().status, OrderStatus::Paid);

        let event = sub.try_recv().unwrap();
        assert_eq!(event.kind, EventKind::PaymentSucceeded);
        assert_eq!(event.payload["payment_id"], "pay-1");
    }

    #[test]
    fn mark_paid_for_unknown_order_still_publishes() {
        let h = harness();
        let sub = h.bus.subscribe();

        let update = h
            .service
            .mark_paid(&OrderId::new("ghost"), "pay-1")
            .unwrap();
        assert_eq!(update.status, OrderStatus::Paid);

        let event = sub.try_recv().unwrap();
        assert_eq!(event.kind, EventKind::PaymentSucceeded);
        assert_eq!(event.payload["order_id"], "ghost");
    }

    #[test]
    fn projection_sees_every_persisted_snapshot() {
        use crate::projection::ProjectOrders;
        use std::sync::Mutex;

        struct Recorder(Mutex<Vec<OrderStatus>>);
        impl ProjectOrders for Recorder {
            fn project_order(&self, order: &Order) {
                self.0.lock().unwrap().push(order.status);
            }
        }

        let bus = Arc::new(EventBus::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let ids = Arc::new(SequenceGenerator::new("ord"));
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let service = OrderService::new(
            Arc::new(MapOrders::default()),
            Arc::new(MapKeys::default()),
            Arc::new(EventPublisher::new(
                Arc::clone(&bus),
                clock.clone() as Arc<dyn Clock>,
                ids.clone() as Arc<dyn IdGenerator>,
            )),
            clock,
            ids,
            OrderProjection::Enabled(Arc::clone(&recorder) as Arc<dyn ProjectOrders>),
        );

        let id = service.create_order(draft(), None).unwrap().order.id;
        service.update_status(&id, OrderStatus::Reserved).unwrap();

        let seen = recorder.0.lock().unwrap();
        assert_eq!(*seen, vec![OrderStatus::Created, OrderStatus::Reserved]);
    }
}
