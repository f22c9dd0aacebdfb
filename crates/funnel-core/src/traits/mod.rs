//! Pluggable seams for the funnel system
//!
//! Every external dependency of the state machines is expressed as a trait
//! so demo stand-ins can be swapped for real implementations without
//! touching the gating or transition logic:
//!
//! - [`OtpVerifier`] / [`OtpDispatcher`]: one-time passcode delivery and check
//! - [`CredentialVerifier`]: admin login check
//! - [`AdminSessionStore`]: the persisted admin session flag
//! - [`ResultSink`]: the CRM/webhook hand-off for completed assessments
//! - [`DispatchAudit`]: audit trail for simulated OTP sends

mod credentials;
mod otp;
mod scoring;
mod session;
mod sink;

pub use credentials::{CredentialVerifier, FixedCredentialVerifier};
pub use otp::{DispatchAudit, FixedCodeVerifier, OtpDispatcher, OtpVerifier};
pub use scoring::{RiskCategory, ScoreThresholds};
pub use session::AdminSessionStore;
pub use sink::ResultSink;
