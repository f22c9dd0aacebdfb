//! Simulated persistence for the assessment funnel
//!
//! Nothing here talks to a real database. The stores exist so the rest of
//! the system can treat persistence as pluggable:
//!
//! - [`MemoryAdminSessionStore`] / [`FileAdminSessionStore`] back the admin
//!   session flag (the server-side analogue of the browser's local
//!   key-value store)
//! - [`RecordingResultSink`] retains completed assessment payloads, the
//!   stand-in for a CRM/webhook integration
//! - [`OtpDispatchLog`] records simulated OTP sends for an audit trail

pub mod kv;
pub mod otp_log;
pub mod sink;

pub use kv::{FileAdminSessionStore, MemoryAdminSessionStore};
pub use otp_log::{DispatchStatus, OtpDispatchLog, OtpDispatchRecord};
pub use sink::{CapturedContact, RecordingResultSink};

use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl From<PersistenceError> for funnel_core::Error {
    fn from(err: PersistenceError) -> Self {
        funnel_core::Error::Storage(err.to_string())
    }
}
