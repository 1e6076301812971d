//! Payment workflow.

use std::sync::Arc;

use quayside_core::{Clock, EngineError, EngineResult, IdGenerator};
use quayside_events::{EventKind, EventPublisher};
use quayside_orders::{OrderId, OrderService};

use crate::intent::{
    CaptureOutcome, CreateIntent, PaymentId, PaymentIntent, PaymentStatus, WebhookEvent,
    WebhookReceipt,
};
use crate::repository::PaymentRepository;

/// Creates payment intents, captures them, and applies verified payment
/// events, advancing order state to paid through the orchestrator.
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    orders: Arc<OrderService>,
    publisher: Arc<EventPublisher>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl PaymentService {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        orders: Arc<OrderService>,
        publisher: Arc<EventPublisher>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            payments,
            orders,
            publisher,
            clock,
            ids,
        }
    }

    /// Create an intent for an order.
    ///
    /// `NotFound` when the order is missing; `Validation` unless the amount
    /// is positive and exactly equal to the order's total — no record is
    /// written on a mismatch. With `capture` set the intent is `Succeeded`
    /// immediately.
    pub fn create_intent(&self, request: CreateIntent) -> EngineResult<PaymentIntent> {
        let order = self.orders.get_order(&request.order_id)?;
        if request.amount <= 0.0 {
            return Err(EngineError::validation("amount must be positive"));
        }
        if request.amount != order.total {
            return Err(EngineError::validation("amount mismatch"));
        }

        let status = if request.capture {
            PaymentStatus::Succeeded
        } else {
            PaymentStatus::RequiresCapture
        };
        let intent = PaymentIntent {
            id: PaymentId::new(self.ids.next_id()),
            order_id: request.order_id,
            amount: request.amount,
            currency: order.currency,
            status,
            created_at: self.clock.now(),
        };
        self.payments.add(&intent)?;

        tracing::info!(payment_id = %intent.id, order_id = %intent.order_id, "payment intent created");
        self.publisher.emit(EventKind::PaymentIntentCreated, {
            let mut payload = serde_json::Map::new();
            payload.insert(
                "order_id".into(),
                serde_json::json!(intent.order_id.as_str()),
            );
            payload.insert("payment_id".into(), serde_json::json!(intent.id.as_str()));
            payload
        });
        Ok(intent)
    }

    /// Finalize an intent.
    ///
    /// Idempotent in effect: capturing an already-succeeded intent re-applies
    /// the same terminal state without error.
    pub fn capture(&self, payment_id: &PaymentId) -> EngineResult<CaptureOutcome> {
        let payment = self.payments.get(payment_id)?.ok_or(EngineError::NotFound)?;

        let updated = payment.with_status(PaymentStatus::Succeeded);
        self.payments.update(&updated)?;
        self.orders
            .mark_paid(&updated.order_id, updated.id.as_str())?;

        tracing::info!(payment_id = %updated.id, order_id = %updated.order_id, "payment captured");
        Ok(CaptureOutcome {
            payment_id: updated.id,
            order_id: updated.order_id,
            status: PaymentStatus::Succeeded,
        })
    }

    pub fn list_all(&self) -> EngineResult<Vec<PaymentIntent>> {
        self.payments.list_all()
    }

    pub fn list_by_order(&self, order_id: &OrderId) -> EngineResult<Vec<PaymentIntent>> {
        self.payments.list_by_order(order_id)
    }

    /// Apply a verified webhook notification.
    ///
    /// `payment.succeeded` marks the matching payment succeeded (when one
    /// exists) and marks the order paid when both ids are present. Any other
    /// event type is acknowledged without effect — a webhook delivery is
    /// never failed for an event we don't recognize.
    pub fn apply_webhook(&self, event: &WebhookEvent) -> EngineResult<WebhookReceipt> {
        if event.kind == "payment.succeeded" {
            let payment_id = event.data.get("payment_id").and_then(|v| v.as_str());
            let order_id = event.data.get("order_id").and_then(|v| v.as_str());

            if let Some(payment_id) = payment_id {
                let payment_id = PaymentId::new(payment_id);
                if let Some(payment) = self.payments.get(&payment_id)? {
                    self.payments
                        .update(&payment.with_status(PaymentStatus::Succeeded))?;
                }
            }
            if let (Some(order_id), Some(payment_id)) = (order_id, payment_id) {
                self.orders
                    .mark_paid(&OrderId::new(order_id), payment_id)?;
            }
        } else {
            tracing::debug!(kind = %event.kind, "ignoring unrecognized webhook event");
        }
        Ok(WebhookReceipt { received: true })
    }
}
