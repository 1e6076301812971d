//! Striped locking by string key.
//!
//! The orchestrator serializes idempotency check-and-set per key and order
//! status transitions per order id. A fixed array of mutexes indexed by key
//! hash gives bounded memory for an unbounded key space; distinct keys may
//! share a stripe, which costs throughput but never correctness.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};

const DEFAULT_STRIPES: usize = 64;

/// Fixed-width set of mutexes indexed by key hash.
#[derive(Debug)]
pub struct StripedLock {
    stripes: Vec<Mutex<()>>,
}

impl StripedLock {
    pub fn new(stripes: usize) -> Self {
        assert!(stripes > 0, "stripe count must be positive");
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Acquire the stripe covering `key`, blocking until it is free.
    ///
    /// The guard on a `()` mutex carries no data, so a poisoned stripe is
    /// still safe to reuse.
    pub fn lock(&self, key: &str) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let idx = (hasher.finish() as usize) % self.stripes.len();
        self.stripes[idx].lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for StripedLock {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
