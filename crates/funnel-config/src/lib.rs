//! Configuration management for the assessment funnel
//!
//! Supports loading configuration from:
//! - YAML files under `config/`
//! - Environment variables (`FUNNEL_` prefix)
//!
//! # Domain Configuration
//!
//! Business content lives in `config/domain/`:
//! - `questions.yaml` - the assessment question bank
//! - `scoring.yaml` - classification thresholds
//! - `messaging.yaml` - messenger deep-link templates
//!
//! Each section falls back to compiled-in demo defaults when the file is
//! missing, so the server runs with no files present at all.

pub mod constants;
pub mod domain;
pub mod settings;

pub use domain::{DomainConfig, MessagingConfig, QuestionBankConfig, ScoringThresholdsConfig};
pub use settings::{
    load_settings, RuntimeEnvironment, ServerConfig, SessionConfig, Settings, SimulationConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
