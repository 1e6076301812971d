//! In-process pub/sub bus.
//!
//! Bounded, lossy, best-effort fan-out:
//!
//! - `publish` never blocks and never fails the triggering business operation
//! - a subscriber whose queue is full drops that event (for that subscriber
//!   only)
//! - disconnected subscribers are pruned during publish
//!
//! This is not a durable log; durability, if wanted, is a collaborator's
//! concern.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Mutex;
use std::time::Duration;

use crate::event::EventMessage;

/// Per-subscriber queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Receiving side of one subscription.
///
/// Designed for single-threaded consumption; each subscription belongs to
/// one consumer task.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    receiver: Receiver<EventMessage>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Block until the next event is available.
    pub fn recv(&self) -> Result<EventMessage, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Receive without blocking.
    pub fn try_recv(&self) -> Result<EventMessage, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EventMessage, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// In-process event bus distributing domain events to live observers.
///
/// Safe to share across threads; multiple publishers may race freely.
#[derive(Debug)]
pub struct EventBus {
    capacity: usize,
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriberId, SyncSender<EventMessage>)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Bus whose subscriber queues hold at most `capacity` undelivered events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            next_id: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Deliver `event` to all current subscribers.
    ///
    /// A full queue drops the event for that subscriber; a hung consumer can
    /// never stall the publish path.
    pub fn publish(&self, event: EventMessage) {
        let mut subs = self
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        subs.retain(|(id, tx)| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!(subscriber = id.0, kind = %event.kind, "queue full, dropping event");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Register a new delivery channel.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::sync_channel(self.capacity);

        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, tx));

        Subscription { id, receiver: rx }
    }

    /// Deregister a delivery channel.
    ///
    /// Safe to call with a handle that was never registered or was already
    /// removed.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(sub_id, _)| *sub_id != id);
    }

    /// Number of live subscriptions (dead ones linger until the next publish).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
