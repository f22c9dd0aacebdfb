//! Core types and traits for the assessment funnel
//!
//! This crate provides the foundational types used across all other crates:
//! - Assessment domain types (questions, answers, captured leads)
//! - Score classification
//! - Pluggable verification and dispatch traits
//! - Error types
//!
//! Nothing here performs I/O. Simulated delays, storage, and HTTP all live
//! in the crates that depend on this one, behind the traits defined in
//! [`traits`].

pub mod assessment;
pub mod error;
pub mod lead;
pub mod traits;

pub use assessment::{Answer, AnswerOption, Question, QuestionSet};
pub use error::{Error, Result};
pub use lead::{Lead, ResultPayload};

pub use traits::{
    AdminSessionStore, CredentialVerifier, DispatchAudit, FixedCodeVerifier,
    FixedCredentialVerifier, OtpDispatcher, OtpVerifier, ResultSink, RiskCategory,
    ScoreThresholds,
};
