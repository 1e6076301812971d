//! Event construction helper shared by the services.

use std::sync::Arc;

use quayside_core::{Clock, IdGenerator};

use crate::bus::EventBus;
use crate::event::{EventKind, EventMessage};

/// Stamps events with a fresh id and the current time, then publishes them.
///
/// One instance is shared by the orchestrator, reservation, and payment
/// services so all events draw from the same id/clock capabilities.
pub struct EventPublisher {
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl EventPublisher {
    pub fn new(bus: Arc<EventBus>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { bus, clock, ids }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Publish a `kind` event with the given payload map.
    ///
    /// Fire-and-forget: never blocks, never fails the caller.
    pub fn emit(&self, kind: EventKind, payload: serde_json::Map<String, serde_json::Value>) {
        self.bus.publish(EventMessage {
            id: self.ids.next_id(),
            kind,
            timestamp: self.clock.now(),
            payload,
        });
    }
}

impl core::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventPublisher").finish_non_exhaustive()
    }
}
