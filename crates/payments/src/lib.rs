//! `quayside-payments` — payment intents, capture, and webhook intake.
//!
//! The workflow creates intents against an order's exact total, captures
//! them, and applies externally-verified payment events. Inbound webhook
//! notifications pass the signature verifier before they reach the workflow.

pub mod intent;
pub mod repository;
pub mod service;
pub mod webhook;

pub use intent::{
    CaptureOutcome, CreateIntent, PaymentId, PaymentIntent, PaymentMethod, PaymentStatus,
    WebhookEvent, WebhookReceipt,
};
pub use repository::PaymentRepository;
pub use service::PaymentService;
pub use webhook::WebhookVerifier;
