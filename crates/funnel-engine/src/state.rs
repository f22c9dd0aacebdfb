//! The funnel state value and its pure transitions
//!
//! Each state variant carries only the fields meaningful to it, so
//! cross-field invariants (answer count vs. question index, lead presence
//! before OTP) hold by construction rather than by discipline. Transitions
//! never mutate: they read `&self` and return the successor value, leaving
//! the original untouched on rejection.

use serde::{Deserialize, Serialize};

use funnel_core::{Answer, Lead, QuestionSet, ResultPayload, ScoreThresholds};

use crate::error::FunnelError;
use crate::otp::OtpSession;
use crate::scoring::total_score;

/// Discriminant of [`FunnelState`], for display and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunnelStage {
    Landing,
    Assessment,
    LeadCapture,
    OtpVerification,
    Result,
}

impl FunnelStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Landing => "Landing",
            Self::Assessment => "Assessment",
            Self::LeadCapture => "Lead Capture",
            Self::OtpVerification => "OTP Verification",
            Self::Result => "Result",
        }
    }
}

/// The funnel state machine value
///
/// Initial state is `Landing`; `Result` is terminal. Restarting means
/// replacing the whole value with a fresh `Landing`, so no answers, lead,
/// or OTP state can ever leak across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunnelState {
    Landing,
    Assessment {
        answers: Vec<Answer>,
        current_index: usize,
    },
    LeadCapture {
        answers: Vec<Answer>,
    },
    OtpVerification {
        answers: Vec<Answer>,
        lead: Lead,
        otp: OtpSession,
    },
    Result {
        payload: ResultPayload,
    },
}

impl Default for FunnelState {
    fn default() -> Self {
        Self::Landing
    }
}

impl FunnelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage discriminant
    pub fn stage(&self) -> FunnelStage {
        match self {
            Self::Landing => FunnelStage::Landing,
            Self::Assessment { .. } => FunnelStage::Assessment,
            Self::LeadCapture { .. } => FunnelStage::LeadCapture,
            Self::OtpVerification { .. } => FunnelStage::OtpVerification,
            Self::Result { .. } => FunnelStage::Result,
        }
    }

    fn invalid(&self, event: &'static str) -> FunnelError {
        FunnelError::InvalidTransition {
            stage: self.stage(),
            event,
        }
    }

    /// `Landing --start--> Assessment`
    pub fn start(&self) -> Result<Self, FunnelError> {
        match self {
            Self::Landing => Ok(Self::Assessment {
                answers: Vec::new(),
                current_index: 0,
            }),
            _ => Err(self.invalid("start")),
        }
    }

    /// `Assessment --answer--> Assessment | LeadCapture`
    ///
    /// Appends the answer built from the selected option and advances, or
    /// moves to lead capture when the final question was just answered.
    pub fn answer(
        &self,
        questions: &QuestionSet,
        option_index: usize,
    ) -> Result<Self, FunnelError> {
        let (answers, current_index) = match self {
            Self::Assessment {
                answers,
                current_index,
            } => (answers, *current_index),
            _ => return Err(self.invalid("answer")),
        };

        // Holds while in Assessment: one recorded answer per question asked
        debug_assert_eq!(answers.len(), current_index);

        let question = questions
            .get(current_index)
            .ok_or_else(|| self.invalid("answer"))?;
        let option = question
            .options
            .get(option_index)
            .ok_or(FunnelError::InvalidOption {
                question_id: question.id,
                index: option_index,
            })?;

        let mut answers = answers.clone();
        answers.push(Answer::from_option(question, option));

        if current_index < questions.last_index() {
            Ok(Self::Assessment {
                answers,
                current_index: current_index + 1,
            })
        } else {
            Ok(Self::LeadCapture { answers })
        }
    }

    /// `LeadCapture --submit_lead--> OtpVerification`
    ///
    /// Guarded by both fields non-empty; a rejected submission leaves the
    /// state unchanged (the caller keeps `self`).
    pub fn submit_lead(&self, lead: Lead) -> Result<Self, FunnelError> {
        let answers = match self {
            Self::LeadCapture { answers } => answers,
            _ => return Err(self.invalid("submit_lead")),
        };

        lead.validate()?;

        Ok(Self::OtpVerification {
            answers: answers.clone(),
            lead,
            otp: OtpSession::new(),
        })
    }

    /// `OtpVerification --send_otp-->` sending
    pub fn begin_otp_dispatch(&self) -> Result<Self, FunnelError> {
        match self {
            Self::OtpVerification {
                answers,
                lead,
                otp,
            } => Ok(Self::OtpVerification {
                answers: answers.clone(),
                lead: lead.clone(),
                otp: otp.begin_dispatch()?,
            }),
            _ => Err(self.invalid("send_otp")),
        }
    }

    /// Dispatch finished; the session becomes verifiable
    pub fn complete_otp_dispatch(&self) -> Result<Self, FunnelError> {
        match self {
            Self::OtpVerification {
                answers,
                lead,
                otp,
            } => Ok(Self::OtpVerification {
                answers: answers.clone(),
                lead: lead.clone(),
                otp: otp.complete_dispatch(),
            }),
            _ => Err(self.invalid("send_otp")),
        }
    }

    /// Record a failed verification, staying in place
    pub fn fail_otp_verification(&self, message: impl Into<String>) -> Result<Self, FunnelError> {
        match self {
            Self::OtpVerification {
                answers,
                lead,
                otp,
            } => Ok(Self::OtpVerification {
                answers: answers.clone(),
                lead: lead.clone(),
                otp: otp.with_error(message),
            }),
            _ => Err(self.invalid("verify_otp")),
        }
    }

    /// Build the completion payload from a verifiable OTP state
    ///
    /// Computes the total score, classifies it, and constructs the payload
    /// that would be handed to an external CRM/webhook integration.
    pub fn build_payload(&self, thresholds: &ScoreThresholds) -> Result<ResultPayload, FunnelError> {
        match self {
            Self::OtpVerification {
                answers,
                lead,
                otp,
            } => {
                if !otp.can_verify() {
                    return Err(FunnelError::OtpNotSent);
                }
                let score = total_score(answers);
                let category = thresholds.classify(score);
                Ok(ResultPayload::new(
                    lead.clone(),
                    score,
                    answers.clone(),
                    category,
                ))
            }
            _ => Err(self.invalid("verify_otp")),
        }
    }

    /// Answers recorded so far, if any
    pub fn answers(&self) -> &[Answer] {
        match self {
            Self::Assessment { answers, .. }
            | Self::LeadCapture { answers }
            | Self::OtpVerification { answers, .. } => answers,
            Self::Result { payload } => &payload.answers,
            Self::Landing => &[],
        }
    }

    /// Completed payload, once in `Result`
    pub fn payload(&self) -> Option<&ResultPayload> {
        match self {
            Self::Result { payload } => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_core::{AnswerOption, Question};

    fn two_question_set() -> QuestionSet {
        QuestionSet::new(vec![
            Question {
                id: 1,
                text: "Q1".into(),
                options: vec![
                    AnswerOption {
                        text: "a".into(),
                        points: 5,
                    },
                    AnswerOption {
                        text: "b".into(),
                        points: 20,
                    },
                ],
            },
            Question {
                id: 2,
                text: "Q2".into(),
                options: vec![
                    AnswerOption {
                        text: "a".into(),
                        points: 0,
                    },
                    AnswerOption {
                        text: "b".into(),
                        points: 20,
                    },
                ],
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_start_only_from_landing() {
        let state = FunnelState::new();
        let started = state.start().unwrap();
        assert_eq!(started.stage(), FunnelStage::Assessment);
        // Starting twice is rejected
        assert!(started.start().is_err());
    }

    #[test]
    fn test_answers_advance_and_transition() {
        let questions = two_question_set();
        let state = FunnelState::new().start().unwrap();

        let mid = state.answer(&questions, 0).unwrap();
        match &mid {
            FunnelState::Assessment {
                answers,
                current_index,
            } => {
                assert_eq!(answers.len(), 1);
                assert_eq!(*current_index, 1);
                assert_eq!(answers[0].question_id, 1);
                assert_eq!(answers[0].points, 5);
            }
            other => panic!("unexpected state: {:?}", other),
        }

        // Final answer moves to lead capture instead of advancing
        let done = mid.answer(&questions, 1).unwrap();
        assert_eq!(done.stage(), FunnelStage::LeadCapture);
        assert_eq!(done.answers().len(), 2);
        assert_eq!(done.answers()[1].question_id, 2);
    }

    #[test]
    fn test_answer_rejects_bad_option() {
        let questions = two_question_set();
        let state = FunnelState::new().start().unwrap();
        assert!(matches!(
            state.answer(&questions, 9),
            Err(FunnelError::InvalidOption {
                question_id: 1,
                index: 9
            })
        ));
    }

    #[test]
    fn test_answer_outside_assessment_rejected() {
        let questions = two_question_set();
        let state = FunnelState::new();
        assert!(state.answer(&questions, 0).is_err());
    }

    #[test]
    fn test_lead_guard_keeps_state() {
        let questions = two_question_set();
        let state = FunnelState::new()
            .start()
            .unwrap()
            .answer(&questions, 0)
            .unwrap()
            .answer(&questions, 0)
            .unwrap();

        assert!(state.submit_lead(Lead::new("", "0812")).is_err());
        assert!(state.submit_lead(Lead::new("Budi", "")).is_err());
        // The original value is untouched and still accepts a valid lead
        let advanced = state.submit_lead(Lead::new("Budi", "0812")).unwrap();
        assert_eq!(advanced.stage(), FunnelStage::OtpVerification);
    }

    #[test]
    fn test_payload_requires_sent_code() {
        let questions = two_question_set();
        let thresholds = ScoreThresholds::default();
        let state = FunnelState::new()
            .start()
            .unwrap()
            .answer(&questions, 1)
            .unwrap()
            .answer(&questions, 1)
            .unwrap()
            .submit_lead(Lead::new("Budi", "0812"))
            .unwrap();

        // No dispatch yet
        assert!(matches!(
            state.build_payload(&thresholds),
            Err(FunnelError::OtpNotSent)
        ));

        let sent = state
            .begin_otp_dispatch()
            .unwrap()
            .complete_otp_dispatch()
            .unwrap();
        let payload = sent.build_payload(&thresholds).unwrap();
        assert_eq!(payload.score, 40);
        assert_eq!(payload.answers.len(), 2);

        let done = FunnelState::Result { payload };
        assert_eq!(done.stage(), FunnelStage::Result);
        assert!(done.payload().is_some());
    }

    #[test]
    fn test_failed_verification_stays_put() {
        let questions = two_question_set();
        let state = FunnelState::new()
            .start()
            .unwrap()
            .answer(&questions, 0)
            .unwrap()
            .answer(&questions, 0)
            .unwrap()
            .submit_lead(Lead::new("Budi", "0812"))
            .unwrap()
            .begin_otp_dispatch()
            .unwrap()
            .complete_otp_dispatch()
            .unwrap();

        let failed = state.fail_otp_verification("Invalid OTP.").unwrap();
        assert_eq!(failed.stage(), FunnelStage::OtpVerification);
        match &failed {
            FunnelState::OtpVerification { otp, .. } => {
                assert_eq!(otp.error.as_deref(), Some("Invalid OTP."));
                assert!(otp.can_verify());
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }
}
