//! Assessment question and answer types
//!
//! A [`QuestionSet`] is an immutable, ordered collection of questions. Each
//! question carries the only point values selectable for it, so an answer
//! built through [`Answer::from_option`] can never hold a score outside the
//! configured range.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single selectable option for a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Display text
    pub text: String,
    /// Points contributed to the total score when selected
    pub points: u32,
}

/// An assessment question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable question id (1-based, unique within a set)
    pub id: u32,
    /// Question text
    pub text: String,
    /// Ordered options; selecting one produces an [`Answer`]
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Maximum points obtainable on this question
    pub fn max_points(&self) -> u32 {
        self.options.iter().map(|o| o.points).max().unwrap_or(0)
    }
}

/// A recorded answer, one per question, appended in question order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Id of the question this answers
    #[serde(rename = "questionId")]
    pub question_id: u32,
    /// Points of the selected option
    pub points: u32,
    /// Text of the selected option
    pub text: String,
}

impl Answer {
    /// Build an answer from a question and one of its options
    pub fn from_option(question: &Question, option: &AnswerOption) -> Self {
        Self {
            question_id: question.id,
            points: option.points,
            text: option.text.clone(),
        }
    }
}

/// Immutable ordered question collection
///
/// Construction validates the structural invariants once, so downstream
/// code can index without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Validate and wrap a list of questions
    ///
    /// Requires at least one question, unique ids, and a non-empty option
    /// list per question.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::InvalidDomainData("question set is empty".into()));
        }
        for q in &questions {
            if q.options.is_empty() {
                return Err(Error::InvalidDomainData(format!(
                    "question {} has no options",
                    q.id
                )));
            }
        }
        let mut ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != questions.len() {
            return Err(Error::InvalidDomainData(
                "question ids are not unique".into(),
            ));
        }
        Ok(Self { questions })
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the final question
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    /// Question at a 0-based position
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// All questions in order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Sum of the maximum points across all questions
    pub fn max_score(&self) -> u32 {
        self.questions.iter().map(Question::max_points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32) -> Question {
        Question {
            id,
            text: format!("Question {}", id),
            options: vec![
                AnswerOption {
                    text: "Low".into(),
                    points: 0,
                },
                AnswerOption {
                    text: "High".into(),
                    points: 20,
                },
            ],
        }
    }

    #[test]
    fn test_question_set_validation() {
        assert!(QuestionSet::new(vec![]).is_err());
        assert!(QuestionSet::new(vec![question(1), question(1)]).is_err());

        let mut no_options = question(1);
        no_options.options.clear();
        assert!(QuestionSet::new(vec![no_options]).is_err());

        let set = QuestionSet::new(vec![question(1), question(2)]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.last_index(), 1);
        assert_eq!(set.max_score(), 40);
    }

    #[test]
    fn test_answer_from_option() {
        let q = question(3);
        let answer = Answer::from_option(&q, &q.options[1]);
        assert_eq!(answer.question_id, 3);
        assert_eq!(answer.points, 20);
        assert_eq!(answer.text, "High");
    }
}
