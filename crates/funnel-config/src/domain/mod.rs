//! Domain configuration
//!
//! Business content for the funnel: the question bank, scoring thresholds,
//! and messaging templates. Each section loads from a YAML file under the
//! configured directory and falls back to compiled-in demo defaults.

mod messaging;
mod questions;
mod scoring;

pub use messaging::MessagingConfig;
pub use questions::{QuestionBankConfig, QuestionEntry};
pub use scoring::ScoringThresholdsConfig;

use std::path::Path;

use crate::ConfigError;

/// All domain configuration sections
#[derive(Debug, Clone, Default)]
pub struct DomainConfig {
    pub questions: QuestionBankConfig,
    pub scoring: ScoringThresholdsConfig,
    pub messaging: MessagingConfig,
}

impl DomainConfig {
    /// Load every section from `dir`, using defaults for missing files
    ///
    /// A present-but-malformed file is an error; silently falling back
    /// would mask typos in deployed config.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();

        let questions = Self::load_section(dir.join("questions.yaml"), QuestionBankConfig::load)?;
        let scoring = Self::load_section(dir.join("scoring.yaml"), ScoringThresholdsConfig::load)?;
        let messaging = Self::load_section(dir.join("messaging.yaml"), MessagingConfig::load)?;

        Ok(Self {
            questions,
            scoring,
            messaging,
        })
    }

    fn load_section<T: Default>(
        path: std::path::PathBuf,
        loader: fn(&Path) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError> {
        if path.exists() {
            loader(&path)
        } else {
            tracing::debug!(path = %path.display(), "domain config file missing, using defaults");
            Ok(T::default())
        }
    }
}
