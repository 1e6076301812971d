//! Identifier generation seam.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Provider of unique opaque identifiers.
///
/// The engine treats ids as opaque strings end to end; callers never parse
/// them back.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Production generator.
///
/// Uses UUIDv7 (time-ordered) in simple hex form. Prefer
/// [`SequenceGenerator`] in tests for determinism.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::now_v7().simple().to_string()
    }
}

/// Deterministic generator for tests: `"{prefix}-{n}"`.
#[derive(Debug)]
pub struct SequenceGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequenceGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}
