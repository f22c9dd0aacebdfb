//! Score classification
//!
//! The total score is the plain sum of the chosen options' points. The
//! classification is a pure, total function of that score over fixed
//! inclusive thresholds.

use serde::{Deserialize, Serialize};

/// Coarse protection classification derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Score 0-40: little to no protection in place
    HighRisk,
    /// Score 41-70: partial coverage with gaps
    ModerateCoverage,
    /// Score 71+: comprehensive protection
    FullyProtected,
}

impl RiskCategory {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HighRisk => "High Risk",
            Self::ModerateCoverage => "Moderate Coverage",
            Self::FullyProtected => "Fully Protected",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighRisk => "high_risk",
            Self::ModerateCoverage => "moderate_coverage",
            Self::FullyProtected => "fully_protected",
        }
    }
}

/// Classification thresholds (inclusive upper bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    /// Scores at or below this are [`RiskCategory::HighRisk`]
    pub high_risk_max: u32,
    /// Scores above `high_risk_max` and at or below this are
    /// [`RiskCategory::ModerateCoverage`]
    pub moderate_max: u32,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            high_risk_max: 40,
            moderate_max: 70,
        }
    }
}

impl ScoreThresholds {
    /// Classify a total score
    pub fn classify(&self, score: u32) -> RiskCategory {
        if score <= self.high_risk_max {
            RiskCategory::HighRisk
        } else if score <= self.moderate_max {
            RiskCategory::ModerateCoverage
        } else {
            RiskCategory::FullyProtected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        let thresholds = ScoreThresholds::default();
        assert_eq!(thresholds.classify(0), RiskCategory::HighRisk);
        assert_eq!(thresholds.classify(40), RiskCategory::HighRisk);
        assert_eq!(thresholds.classify(41), RiskCategory::ModerateCoverage);
        assert_eq!(thresholds.classify(70), RiskCategory::ModerateCoverage);
        assert_eq!(thresholds.classify(71), RiskCategory::FullyProtected);
        assert_eq!(thresholds.classify(100), RiskCategory::FullyProtected);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RiskCategory::HighRisk.display_name(), "High Risk");
        assert_eq!(
            RiskCategory::ModerateCoverage.display_name(),
            "Moderate Coverage"
        );
        assert_eq!(RiskCategory::FullyProtected.display_name(), "Fully Protected");
    }
}
