//! Funnel errors
//!
//! Every "failure" a visitor can cause (wrong code, missing field, event
//! out of order) is a normal recoverable outcome, never fatal to the
//! session.

use thiserror::Error;

use crate::state::FunnelStage;

#[derive(Error, Debug)]
pub enum FunnelError {
    /// Event is not defined for the current state
    #[error("Event '{event}' is not valid in the {stage:?} state")]
    InvalidTransition {
        stage: FunnelStage,
        event: &'static str,
    },

    /// A required lead field was missing or empty
    #[error("Validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// The selected option index does not exist on the current question
    #[error("Option {index} does not exist on question {question_id}")]
    InvalidOption { question_id: u32, index: usize },

    /// Verification was attempted before a code was dispatched
    #[error("No OTP has been sent yet")]
    OtpNotSent,

    /// A simulated dispatch is still in flight
    #[error("OTP dispatch already in progress")]
    DispatchInFlight,

    /// The submitted code did not match; carries the inline user message
    #[error("{message}")]
    OtpMismatch { message: String },
}

impl From<funnel_core::Error> for FunnelError {
    fn from(err: funnel_core::Error) -> Self {
        match err {
            funnel_core::Error::Validation { field, message } => {
                FunnelError::Validation { field, message }
            }
            other => FunnelError::Validation {
                field: "payload".to_string(),
                message: other.to_string(),
            },
        }
    }
}
