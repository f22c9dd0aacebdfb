//! Assessment funnel state machine
//!
//! The funnel is a linear five-state flow:
//!
//! ```text
//! Landing --start--> Assessment --answer x N--> LeadCapture
//!     --submit_lead--> OtpVerification --verify--> Result
//! ```
//!
//! [`state::FunnelState`] is an immutable tagged union transformed by pure
//! transition functions; [`funnel::Funnel`] wraps one state value with the
//! injected verification/dispatch seams and drives the simulated
//! asynchronous calls, including cancellation of in-flight dispatches on
//! teardown.

pub mod error;
pub mod funnel;
pub mod otp;
pub mod scoring;
pub mod state;

pub use error::FunnelError;
pub use funnel::{Funnel, FunnelRuntimeConfig, FunnelSnapshot};
pub use otp::{OtpSession, SimulatedOtpGateway};
pub use state::{FunnelStage, FunnelState};
