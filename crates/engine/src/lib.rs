//! `quayside-engine` — wiring and operational surface.
//!
//! Builds the order/inventory/payment services against one shared clock,
//! id generator, event bus, and repository set, exactly once at startup.
//! Collaborators (transport layer, UI, analytics) talk to the [`Engine`];
//! nothing here knows about HTTP.

pub mod config;
pub mod engine;
pub mod metrics;
pub mod telemetry;

pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder};
pub use metrics::{MetricsService, MetricsSnapshot};
