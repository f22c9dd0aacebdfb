//! Scoring threshold configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use funnel_core::ScoreThresholds;

use crate::ConfigError;

/// Classification thresholds loaded from scoring.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringThresholdsConfig {
    /// Scores at or below this are High Risk
    #[serde(default = "default_high_risk_max")]
    pub high_risk_max: u32,
    /// Scores above `high_risk_max` and at or below this are Moderate
    /// Coverage; anything higher is Fully Protected
    #[serde(default = "default_moderate_max")]
    pub moderate_max: u32,
}

fn default_high_risk_max() -> u32 {
    40
}

fn default_moderate_max() -> u32 {
    70
}

impl Default for ScoringThresholdsConfig {
    fn default() -> Self {
        Self {
            high_risk_max: default_high_risk_max(),
            moderate_max: default_moderate_max(),
        }
    }
}

impl ScoringThresholdsConfig {
    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let parsed: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Bounds must be ordered or classification degenerates
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.high_risk_max >= self.moderate_max {
            return Err(ConfigError::InvalidValue {
                field: "scoring.high_risk_max".to_string(),
                message: format!(
                    "must be below moderate_max ({} >= {})",
                    self.high_risk_max, self.moderate_max
                ),
            });
        }
        Ok(())
    }

    /// Convert into the core threshold type
    pub fn to_thresholds(&self) -> ScoreThresholds {
        ScoreThresholds {
            high_risk_max: self.high_risk_max,
            moderate_max: self.moderate_max,
        }
    }
}
