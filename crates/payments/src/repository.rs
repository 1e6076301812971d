//! Storage contract for payment intents.

use quayside_core::EngineResult;
use quayside_orders::OrderId;

use crate::intent::{PaymentId, PaymentIntent};

/// Durability boundary for payment intents.
pub trait PaymentRepository: Send + Sync {
    fn add(&self, payment: &PaymentIntent) -> EngineResult<()>;

    fn get(&self, payment_id: &PaymentId) -> EngineResult<Option<PaymentIntent>>;

    fn list_by_order(&self, order_id: &OrderId) -> EngineResult<Vec<PaymentIntent>>;

    fn list_all(&self) -> EngineResult<Vec<PaymentIntent>>;

    fn update(&self, payment: &PaymentIntent) -> EngineResult<()>;
}
