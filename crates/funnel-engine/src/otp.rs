//! OTP session state and the simulated dispatch gateway

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use funnel_core::{DispatchAudit, OtpDispatcher, OtpVerifier, Result};

use crate::error::FunnelError;

/// Ephemeral OTP verification state, in-memory only
///
/// Lifecycle: not-sent -> sending -> sent -> verified or error. A mismatch
/// keeps `sent` true and the session re-submittable; there is no attempt
/// counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpSession {
    /// A code has been (simulated-)delivered
    pub sent: bool,
    /// A dispatch is in flight; blocks re-entry of the send operation
    pub loading: bool,
    /// Inline error from the last failed verification
    pub error: Option<String>,
}

impl OtpSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the sending state
    pub fn begin_dispatch(&self) -> std::result::Result<Self, FunnelError> {
        if self.loading {
            return Err(FunnelError::DispatchInFlight);
        }
        Ok(Self {
            sent: self.sent,
            loading: true,
            error: None,
        })
    }

    /// Dispatch completed; the code is now "delivered"
    pub fn complete_dispatch(&self) -> Self {
        Self {
            sent: true,
            loading: false,
            error: self.error.clone(),
        }
    }

    /// Record a failed verification
    pub fn with_error(&self, message: impl Into<String>) -> Self {
        Self {
            sent: self.sent,
            loading: self.loading,
            error: Some(message.into()),
        }
    }

    /// Ready for a verify attempt
    pub fn can_verify(&self) -> bool {
        self.sent && !self.loading
    }
}

/// Simulated OTP gateway
///
/// Stands in for a third-party SMS/WhatsApp API: dispatch sleeps for a
/// configured duration and then "succeeds"; verification compares against
/// one fixed accepted code. Sends are optionally recorded through a
/// [`DispatchAudit`] so the simulation leaves a trail.
pub struct SimulatedOtpGateway {
    accepted_code: String,
    dispatch_delay: Duration,
    audit: Option<Arc<dyn DispatchAudit>>,
}

impl SimulatedOtpGateway {
    pub fn new(accepted_code: impl Into<String>, dispatch_delay: Duration) -> Self {
        Self {
            accepted_code: accepted_code.into(),
            dispatch_delay,
            audit: None,
        }
    }

    /// Attach a dispatch audit trail
    pub fn with_audit(mut self, audit: Arc<dyn DispatchAudit>) -> Self {
        self.audit = Some(audit);
        self
    }
}

#[async_trait]
impl OtpDispatcher for SimulatedOtpGateway {
    async fn dispatch(&self, phone: &str) -> Result<()> {
        let message_id = match &self.audit {
            Some(audit) => Some(audit.record_queued(phone).await?),
            None => None,
        };

        tracing::info!(phone = %phone, delay_ms = self.dispatch_delay.as_millis() as u64,
            "simulating OTP dispatch");
        tokio::time::sleep(self.dispatch_delay).await;

        if let (Some(audit), Some(id)) = (&self.audit, message_id) {
            audit.record_sent(id, Utc::now()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl OtpVerifier for SimulatedOtpGateway {
    async fn verify(&self, _phone: &str, code: &str) -> bool {
        code == self.accepted_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_session_lifecycle() {
        let session = OtpSession::new();
        assert!(!session.sent);
        assert!(!session.can_verify());

        let sending = session.begin_dispatch().unwrap();
        assert!(sending.loading);
        assert!(!sending.can_verify());
        // Re-entry while loading is rejected
        assert!(matches!(
            sending.begin_dispatch(),
            Err(FunnelError::DispatchInFlight)
        ));

        let sent = sending.complete_dispatch();
        assert!(sent.sent);
        assert!(!sent.loading);
        assert!(sent.can_verify());

        let failed = sent.with_error("wrong code");
        assert!(failed.sent);
        assert_eq!(failed.error.as_deref(), Some("wrong code"));
        // Still re-submittable after a mismatch
        assert!(failed.can_verify());
    }

    #[test]
    fn test_resend_clears_error() {
        let session = OtpSession {
            sent: true,
            loading: false,
            error: Some("wrong code".into()),
        };
        let resending = session.begin_dispatch().unwrap();
        assert!(resending.error.is_none());
        assert!(resending.sent);
    }

    #[tokio::test]
    async fn test_gateway_verify() {
        let gateway = SimulatedOtpGateway::new("123456", Duration::ZERO);
        assert!(gateway.verify("0812", "123456").await);
        assert!(!gateway.verify("0812", "654321").await);
    }

    #[tokio::test]
    async fn test_gateway_dispatch_resolves() {
        let gateway = SimulatedOtpGateway::new("123456", Duration::from_millis(5));
        gateway.dispatch("0812").await.unwrap();
    }
}
