//! Storage contract for stock levels.

use quayside_core::EngineResult;

use crate::item::{InventoryItem, ReservationLine, Shortage};

/// Durability boundary for inventory.
///
/// `try_reserve` is the two-phase check-then-commit collapsed into a single
/// atomic repository call: when the backing store is shared between
/// processes, a conditional decrement there beats any in-process lock.
pub trait InventoryRepository: Send + Sync {
    fn get(&self, sku: &str) -> EngineResult<Option<InventoryItem>>;

    fn list_all(&self) -> EngineResult<Vec<InventoryItem>>;

    /// Atomically reserve every line or none of them.
    ///
    /// Returns the complete shortage list (unknown sku counts as zero
    /// available) without mutating anything when any line falls short.
    /// On success every sku is decremented by the requested quantity,
    /// clamped at zero — a benign race that slipped past the check must
    /// never drive stock negative.
    ///
    /// Implementations must serialize this call against concurrent
    /// reservations touching the same skus: two requests racing for the
    /// last unit may not both pass the check.
    fn try_reserve(&self, lines: &[ReservationLine]) -> EngineResult<Vec<Shortage>>;
}
