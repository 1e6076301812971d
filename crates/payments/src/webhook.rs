//! Inbound webhook signature verification.
//!
//! Header form: `t=<unix-seconds>,v1=<hex-hmac-sha256>`. The canonical
//! signed string is `"{t}.{raw_body}"` and the secret is a shared static
//! value. Comparison is constant-time via `Mac::verify_slice`.
//!
//! There is deliberately no timestamp-freshness check here; a captured
//! valid signature stays replayable. Flagged as an open question upstream —
//! do not tighten without confirming intent with the gateway contract.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use quayside_core::{EngineError, EngineResult};

type HmacSha256 = Hmac<Sha256>;

/// Validates signed inbound payment notifications before they reach the
/// payment workflow.
pub struct WebhookVerifier {
    secret: String,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify `signature_header` against `payload`.
    ///
    /// `Validation` when the header cannot be parsed into its `t`/`v1`
    /// components (or the body is not UTF-8); `Unauthorized` when the
    /// computed digest does not match.
    pub fn verify(&self, signature_header: &str, payload: &[u8]) -> EngineResult<()> {
        let (timestamp, signature) = parse_header(signature_header)?;

        let body = std::str::from_utf8(payload)
            .map_err(|_| EngineError::validation("webhook payload is not valid UTF-8"))?;
        let signed_payload = format!("{timestamp}.{body}");

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| EngineError::validation("invalid webhook secret"))?;
        mac.update(signed_payload.as_bytes());

        let sig_bytes = hex::decode(signature).map_err(|_| {
            tracing::warn!("webhook signature is not valid hex");
            EngineError::Unauthorized
        })?;
        mac.verify_slice(&sig_bytes).map_err(|_| {
            tracing::warn!("webhook signature mismatch");
            EngineError::Unauthorized
        })
    }
}

fn parse_header(header: &str) -> EngineResult<(&str, &str)> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((key, value)) = part.split_once('=') else {
            return Err(EngineError::validation("malformed signature header"));
        };
        match key {
            "t" => timestamp = Some(value),
            "v1" => signature = Some(value),
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(v1)) => Ok((t, v1)),
        _ => Err(EngineError::validation(
            "signature header missing t/v1 components",
        )),
    }
}
