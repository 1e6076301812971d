//! Service wiring.

use std::sync::Arc;

use anyhow::Context;

use quayside_core::{Clock, EngineError, EngineResult, IdGenerator, SystemClock, UuidGenerator};
use quayside_events::{EventBus, EventPublisher, SubscriberId, Subscription};
use quayside_infra::{
    load_inventory_seed, InMemoryIdempotencyStore, InMemoryInventoryRepository,
    InMemoryOrderRepository, InMemoryPaymentRepository,
};
use quayside_inventory::{InventoryItem, InventoryRepository, ReservationService};
use quayside_orders::{IdempotencyStore, OrderProjection, OrderRepository, OrderService};
use quayside_payments::{
    PaymentRepository, PaymentService, WebhookEvent, WebhookReceipt, WebhookVerifier,
};

use crate::config::EngineConfig;
use crate::metrics::MetricsService;

/// One shared engine instance serving many concurrent callers.
pub struct Engine {
    bus: Arc<EventBus>,
    orders: Arc<OrderService>,
    reservations: Arc<ReservationService>,
    payments: Arc<PaymentService>,
    metrics: MetricsService,
    webhook: WebhookVerifier,
}

impl Engine {
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// Order operations: create, get, list, mark-paid.
    pub fn orders(&self) -> &Arc<OrderService> {
        &self.orders
    }

    /// Inventory operations: reserve, get-by-sku, list-all.
    pub fn reservations(&self) -> &Arc<ReservationService> {
        &self.reservations
    }

    /// Payment operations: create-intent, capture, list, apply-webhook.
    pub fn payments(&self) -> &Arc<PaymentService> {
        &self.payments
    }

    pub fn metrics(&self) -> &MetricsService {
        &self.metrics
    }

    /// Register a delivery channel for the domain event stream.
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// Deregister a delivery channel; safe to repeat.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.bus.unsubscribe(id);
    }

    /// Verify and apply one inbound webhook delivery.
    ///
    /// Verification failures surface as `Validation`/`Unauthorized`; a body
    /// that does not parse as a webhook event is `Validation`. Recognized
    /// events reach the payment workflow, everything else is acknowledged.
    pub fn handle_webhook(
        &self,
        signature_header: &str,
        payload: &[u8],
    ) -> EngineResult<WebhookReceipt> {
        self.webhook.verify(signature_header, payload)?;
        let event: WebhookEvent = serde_json::from_slice(payload)
            .map_err(|err| EngineError::validation(format!("malformed webhook body: {err}")))?;
        self.payments.apply_webhook(&event)
    }
}

/// Assembles an [`Engine`], defaulting every capability to its in-memory /
/// system implementation. Repositories, clock, and ids are overridable for
/// tests and for externally shared stores.
pub struct EngineBuilder {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    orders: Option<Arc<dyn OrderRepository>>,
    idempotency: Option<Arc<dyn IdempotencyStore>>,
    inventory: Option<Arc<dyn InventoryRepository>>,
    payments: Option<Arc<dyn PaymentRepository>>,
    projection: OrderProjection,
}

impl EngineBuilder {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            orders: None,
            idempotency: None,
            inventory: None,
            payments: None,
            projection: OrderProjection::Disabled,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn order_repository(mut self, orders: Arc<dyn OrderRepository>) -> Self {
        self.orders = Some(orders);
        self
    }

    pub fn idempotency_store(mut self, store: Arc<dyn IdempotencyStore>) -> Self {
        self.idempotency = Some(store);
        self
    }

    pub fn inventory_repository(mut self, inventory: Arc<dyn InventoryRepository>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn payment_repository(mut self, payments: Arc<dyn PaymentRepository>) -> Self {
        self.payments = Some(payments);
        self
    }

    /// Select the projection variant once, at wiring time.
    pub fn projection(mut self, projection: OrderProjection) -> Self {
        self.projection = projection;
        self
    }

    pub fn build(self) -> anyhow::Result<Engine> {
        let bus = Arc::new(EventBus::with_capacity(self.config.event_queue_capacity));
        let publisher = Arc::new(EventPublisher::new(
            Arc::clone(&bus),
            Arc::clone(&self.clock),
            Arc::clone(&self.ids),
        ));

        let order_repo = self
            .orders
            .unwrap_or_else(|| Arc::new(InMemoryOrderRepository::new()));
        let idempotency = self
            .idempotency
            .unwrap_or_else(|| Arc::new(InMemoryIdempotencyStore::new()));
        let inventory_repo = match self.inventory {
            Some(repo) => repo,
            None => {
                let stock: Vec<InventoryItem> = match &self.config.inventory_seed_path {
                    Some(path) => {
                        load_inventory_seed(path).context("loading inventory seed")?
                    }
                    None => Vec::new(),
                };
                Arc::new(InMemoryInventoryRepository::new(stock))
            }
        };
        let payment_repo = self
            .payments
            .unwrap_or_else(|| Arc::new(InMemoryPaymentRepository::new()));

        let orders = Arc::new(OrderService::new(
            Arc::clone(&order_repo),
            idempotency,
            Arc::clone(&publisher),
            Arc::clone(&self.clock),
            Arc::clone(&self.ids),
            self.projection,
        ));
        let reservations = Arc::new(ReservationService::new(
            inventory_repo,
            Arc::clone(&orders),
            Arc::clone(&publisher),
        ));
        let payments = Arc::new(PaymentService::new(
            payment_repo,
            Arc::clone(&orders),
            Arc::clone(&publisher),
            Arc::clone(&self.clock),
            Arc::clone(&self.ids),
        ));
        let metrics = MetricsService::new(order_repo, Arc::clone(&self.clock));

        tracing::info!("engine wired");
        Ok(Engine {
            bus,
            orders,
            reservations,
            payments,
            metrics,
            webhook: WebhookVerifier::new(self.config.webhook_secret),
        })
    }
}
