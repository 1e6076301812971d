//! Engine error model.

use thiserror::Error;

/// Result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Terminal outcome of a single engine operation.
///
/// Keep this focused on deterministic business failures. None of these are
/// retried internally; the transport layer decides user-visible behavior.
/// Idempotency-key replay is **not** an error path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed input (amount mismatch, unparsable signature header, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced order/payment does not exist.
    #[error("not found")]
    NotFound,

    /// Signature or credential mismatch.
    #[error("unauthorized")]
    Unauthorized,

    /// Reserved for future use; carries a structured detail payload so the
    /// transport layer can surface it without re-encoding.
    #[error("conflict")]
    Conflict(serde_json::Value),

    /// A repository failure, propagated as-is from the durability boundary.
    #[error("storage: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
