//! `quayside-infra` — concrete backing for the engine's contracts.
//!
//! In-memory repository implementations (tests/dev, and the default wiring)
//! plus the inventory seed loader. A relational store would implement the
//! same traits; the engine never knows the difference.

pub mod memory;
pub mod seed;


pub use memory::{
    InMemoryIdempotencyStore, InMemoryInventoryRepository, InMemoryOrderRepository,
    InMemoryPaymentRepository,
};
pub use seed::load_inventory_seed;
