//! Environment-driven configuration.

use std::path::PathBuf;

use quayside_events::DEFAULT_QUEUE_CAPACITY;

const DEV_WEBHOOK_SECRET: &str = "quayside-dev-webhook-secret";

/// Startup configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Shared static secret for inbound webhook signatures.
    pub webhook_secret: String,
    /// Per-subscriber event queue capacity.
    pub event_queue_capacity: usize,
    /// Optional JSON file with starting stock levels.
    pub inventory_seed_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            webhook_secret: DEV_WEBHOOK_SECRET.to_owned(),
            event_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            inventory_seed_path: None,
        }
    }
}

impl EngineConfig {
    /// Read configuration from `QUAYSIDE_*` environment variables, falling
    /// back to development defaults.
    pub fn from_env() -> Self {
        let webhook_secret = std::env::var("QUAYSIDE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            tracing::warn!("QUAYSIDE_WEBHOOK_SECRET not set, using development secret");
            DEV_WEBHOOK_SECRET.to_owned()
        });
        let event_queue_capacity = std::env::var("QUAYSIDE_EVENT_QUEUE_CAPACITY")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);
        let inventory_seed_path = std::env::var("QUAYSIDE_INVENTORY_SEED")
            .ok()
            .map(PathBuf::from);

        Self {
            webhook_secret,
            event_queue_capacity,
            inventory_seed_path,
        }
    }
}
