//! `quayside-core` — engine foundation building blocks.
//!
//! This crate contains **pure capability** primitives (no business logic):
//! the error model, wall-clock and id-generation seams, and the striped
//! locks the orchestrator uses to serialize per-key work.

pub mod clock;
pub mod error;
pub mod id;
pub mod lock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{EngineError, EngineResult};
pub use id::{IdGenerator, SequenceGenerator, UuidGenerator};
pub use lock::StripedLock;
