//! OTP verification and dispatch seams
//!
//! Real delivery and validation live behind these traits. The demo
//! implementation accepts a single fixed code; a production system would
//! substitute an SMS/WhatsApp gateway without touching the funnel logic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;

/// Checks a submitted code for a phone number
#[async_trait]
pub trait OtpVerifier: Send + Sync {
    /// Returns true when the code is acceptable for this phone
    async fn verify(&self, phone: &str, code: &str) -> bool;
}

/// Dispatches a one-time passcode to a phone number
#[async_trait]
pub trait OtpDispatcher: Send + Sync {
    /// Deliver (or simulate delivering) a code; resolves when the send
    /// completes
    async fn dispatch(&self, phone: &str) -> Result<()>;
}

/// Audit trail for dispatches
///
/// Lets the persistence layer record simulated sends without the
/// dispatcher depending on a storage crate.
#[async_trait]
pub trait DispatchAudit: Send + Sync {
    /// Record a dispatch that has been queued; returns its message id
    async fn record_queued(&self, phone: &str) -> Result<Uuid>;

    /// Mark a queued dispatch as sent
    async fn record_sent(&self, message_id: Uuid, sent_at: DateTime<Utc>) -> Result<()>;
}

/// Demo verifier that accepts exactly one configured code
///
/// No delay, no state: the pure comparison the demo flow is built on.
#[derive(Debug, Clone)]
pub struct FixedCodeVerifier {
    accepted_code: String,
}

impl FixedCodeVerifier {
    pub fn new(accepted_code: impl Into<String>) -> Self {
        Self {
            accepted_code: accepted_code.into(),
        }
    }
}

#[async_trait]
impl OtpVerifier for FixedCodeVerifier {
    async fn verify(&self, _phone: &str, code: &str) -> bool {
        code == self.accepted_code
    }
}
