//! `quayside-events` — domain events and the in-process event bus.
//!
//! Every state-changing operation in the engine publishes one event; the bus
//! fans it out to any live subscriber (streaming/notification channels).
//! Delivery is bounded, lossy, and best-effort — this is a distribution
//! mechanism, not a durable log.

pub mod bus;
pub mod event;
pub mod publisher;

pub use bus::{EventBus, SubscriberId, Subscription, DEFAULT_QUEUE_CAPACITY};
pub use event::{EventKind, EventMessage};
pub use publisher::EventPublisher;
