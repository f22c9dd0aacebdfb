//! Assessment question bank configuration
//!
//! The default bank is the five-question financial-protection assessment.
//! A deployment can replace it wholesale via `questions.yaml`; structural
//! invariants are enforced when converting into a
//! [`funnel_core::QuestionSet`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use funnel_core::{AnswerOption, Question, QuestionSet};

use crate::ConfigError;

/// One question as it appears in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub id: u32,
    pub text: String,
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionEntry {
    pub text: String,
    pub points: u32,
}

/// Question bank loaded from questions.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBankConfig {
    pub questions: Vec<QuestionEntry>,
}

impl Default for QuestionBankConfig {
    fn default() -> Self {
        Self {
            questions: default_questions(),
        }
    }
}

impl QuestionBankConfig {
    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Convert into the validated core type
    pub fn to_question_set(&self) -> Result<QuestionSet, ConfigError> {
        let questions = self
            .questions
            .iter()
            .map(|entry| Question {
                id: entry.id,
                text: entry.text.clone(),
                options: entry
                    .options
                    .iter()
                    .map(|o| AnswerOption {
                        text: o.text.clone(),
                        points: o.points,
                    })
                    .collect(),
            })
            .collect();

        QuestionSet::new(questions).map_err(|e| ConfigError::InvalidValue {
            field: "questions".to_string(),
            message: e.to_string(),
        })
    }
}

/// The demo assessment: 5 questions, 20 points maximum each
fn default_questions() -> Vec<QuestionEntry> {
    fn opt(text: &str, points: u32) -> OptionEntry {
        OptionEntry {
            text: text.to_string(),
            points,
        }
    }

    vec![
        QuestionEntry {
            id: 1,
            text: "How prepared are you for unexpected medical emergencies?".to_string(),
            options: vec![
                opt("I rely entirely on personal savings", 5),
                opt("I rely on my employer's basic health coverage", 10),
                opt("I have personal health insurance with moderate limits", 15),
                opt("I have comprehensive health and critical illness coverage", 20),
            ],
        },
        QuestionEntry {
            id: 2,
            text: "If you were unable to work due to illness or injury, how long could you \
                   sustain your current lifestyle?"
                .to_string(),
            options: vec![
                opt("Less than 1 month", 0),
                opt("1 to 3 months", 5),
                opt("3 to 6 months", 10),
                opt("More than 6 months (I have income protection)", 20),
            ],
        },
        QuestionEntry {
            id: 3,
            text: "Have you planned for your family's financial security in the event of your \
                   unexpected passing?"
                .to_string(),
            options: vec![
                opt("I haven't thought about it yet", 0),
                opt("I have some savings set aside", 5),
                opt("I have a basic term life insurance policy", 15),
                opt(
                    "I have a structured life insurance plan tied to my family's needs",
                    20,
                ),
            ],
        },
        QuestionEntry {
            id: 4,
            text: "How much of your monthly income is currently allocated to insurance and \
                   protective assets?"
                .to_string(),
            options: vec![
                opt("0% - None currently", 5),
                opt("1% - 5%", 10),
                opt("6% - 10%", 15),
                opt("More than 10%", 20),
            ],
        },
        QuestionEntry {
            id: 5,
            text: "How often do you review and update your financial and insurance portfolio?"
                .to_string(),
            options: vec![
                opt("I've never reviewed it", 0),
                opt("Only when changing jobs or major life events", 5),
                opt("Every few years", 15),
                opt("Annually with a professional advisor", 20),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bank_shape() {
        let bank = QuestionBankConfig::default();
        assert_eq!(bank.questions.len(), 5);

        let set = bank.to_question_set().unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.max_score(), 100);

        // Sequential 1-based ids
        for (i, q) in set.questions().iter().enumerate() {
            assert_eq!(q.id as usize, i + 1);
        }
    }

    #[test]
    fn test_lowest_options_sum() {
        // Choosing the lowest-point option each time yields 5+0+0+5+0 = 10
        let set = QuestionBankConfig::default().to_question_set().unwrap();
        let min_total: u32 = set
            .questions()
            .iter()
            .map(|q| q.options.iter().map(|o| o.points).min().unwrap())
            .sum();
        assert_eq!(min_total, 10);
    }

    #[test]
    fn test_yaml_round_trip() {
        let bank = QuestionBankConfig::default();
        let yaml = serde_yaml::to_string(&bank).unwrap();
        let parsed: QuestionBankConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.questions.len(), 5);
        assert_eq!(parsed.questions[0].options[3].points, 20);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut bank = QuestionBankConfig::default();
        bank.questions[1].id = 1;
        assert!(bank.to_question_set().is_err());
    }
}
