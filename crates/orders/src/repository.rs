//! Storage contracts for orders and idempotency records.
//!
//! Repositories persist and retrieve snapshots; they never mutate business
//! state. Any concrete store (in-memory map, relational table) implements
//! these traits; the engine is constructed against the traits only. Storage
//! failures surface as [`quayside_core::EngineError::Storage`] and are never
//! retried or translated here.

use quayside_core::EngineResult;

use crate::order::{Order, OrderId, OrderStatus};

/// Durability boundary for orders.
pub trait OrderRepository: Send + Sync {
    fn add(&self, order: &Order) -> EngineResult<()>;

    fn get(&self, order_id: &OrderId) -> EngineResult<Option<Order>>;

    /// Snapshots filtered by status, truncated to `limit`.
    fn list(&self, status: Option<OrderStatus>, limit: usize) -> EngineResult<Vec<Order>>;

    fn update(&self, order: &Order) -> EngineResult<()>;

    fn count(&self) -> EngineResult<usize>;

    fn total_revenue(&self) -> EngineResult<f64>;

    fn paid_count(&self) -> EngineResult<usize>;
}

/// Caller-supplied key → the order its first successful creation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct IdempotencyRecord {
    pub key: String,
    pub order: Order,
}

/// Durability boundary for idempotency records.
///
/// A key is bound at the first successful creation and never overwritten or
/// deleted afterwards.
pub trait IdempotencyStore: Send + Sync {
    fn get(&self, key: &str) -> EngineResult<Option<IdempotencyRecord>>;

    /// Bind `record.key`. First writer wins: if the key is already bound the
    /// existing record is kept and the call succeeds.
    fn set(&self, record: IdempotencyRecord) -> EngineResult<()>;
}
