//! `quayside-orders` — order model and lifecycle orchestration.
//!
//! The orchestrator owns order creation (including idempotency-key
//! deduplication), status transitions, and the `order.created` /
//! `payment.succeeded` events. Repositories persist snapshots only; business
//! state is never mutated outside this crate.

pub mod order;
pub mod projection;
pub mod repository;
pub mod service;

pub use order::{order_total, CreateOrderOutcome, NewOrder, Order, OrderId, OrderLine, OrderStatus, StatusUpdate};
pub use projection::{OrderProjection, ProjectOrders};
pub use repository::{IdempotencyRecord, IdempotencyStore, OrderRepository};
pub use service::OrderService;
