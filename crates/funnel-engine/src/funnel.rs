//! Funnel runtime
//!
//! [`Funnel`] pairs one [`FunnelState`] value with the injected seams and
//! drives the simulated asynchronous operations. Dispatches run as spawned
//! tasks holding only a weak reference to the state cell, and the task
//! handle is aborted on teardown, so an in-flight simulated send can never
//! touch a funnel that no longer exists.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use funnel_core::{
    Lead, OtpDispatcher, OtpVerifier, Question, QuestionSet, ResultPayload, ResultSink,
    ScoreThresholds,
};

use crate::error::FunnelError;
use crate::otp::OtpSession;
use crate::state::{FunnelStage, FunnelState};

/// Behavioral knobs for a funnel instance
#[derive(Debug, Clone)]
pub struct FunnelRuntimeConfig {
    /// Classification thresholds applied on completion
    pub thresholds: ScoreThresholds,
    /// Inline message recorded on a failed verification
    pub mismatch_error: String,
}

/// One visitor's funnel
pub struct Funnel {
    id: Uuid,
    state: Arc<RwLock<FunnelState>>,
    questions: Arc<QuestionSet>,
    config: FunnelRuntimeConfig,
    verifier: Arc<dyn OtpVerifier>,
    dispatcher: Arc<dyn OtpDispatcher>,
    sink: Arc<dyn ResultSink>,
    pending_dispatch: Mutex<Option<JoinHandle<()>>>,
}

impl Funnel {
    pub fn new(
        questions: Arc<QuestionSet>,
        config: FunnelRuntimeConfig,
        verifier: Arc<dyn OtpVerifier>,
        dispatcher: Arc<dyn OtpDispatcher>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: Arc::new(RwLock::new(FunnelState::new())),
            questions,
            config,
            verifier,
            dispatcher,
            sink,
            pending_dispatch: Mutex::new(None),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> FunnelStage {
        self.state.read().stage()
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> FunnelSnapshot {
        FunnelSnapshot::of(self.id, &self.state.read(), &self.questions)
    }

    /// `start`: begin the assessment
    pub fn start(&self) -> Result<(), FunnelError> {
        let mut state = self.state.write();
        let next = state.start()?;
        *state = next;
        tracing::debug!(funnel_id = %self.id, "assessment started");
        Ok(())
    }

    /// `answer`: record the selected option for the current question
    pub fn answer(&self, option_index: usize) -> Result<(), FunnelError> {
        let mut state = self.state.write();
        let next = state.answer(&self.questions, option_index)?;
        let stage = next.stage();
        *state = next;
        tracing::debug!(funnel_id = %self.id, stage = ?stage, "answer recorded");
        Ok(())
    }

    /// `submit_lead`: capture contact identity and move to verification
    pub fn submit_lead(&self, name: &str, phone: &str) -> Result<(), FunnelError> {
        let mut state = self.state.write();
        let next = state.submit_lead(Lead::new(name, phone))?;
        *state = next;
        tracing::info!(funnel_id = %self.id, "lead captured");
        Ok(())
    }

    /// `send_otp`: begin a simulated dispatch
    ///
    /// Returns as soon as the session is in the sending state; the
    /// delivery itself completes in a background task. Re-entry while a
    /// dispatch is in flight is rejected.
    pub fn send_otp(&self) -> Result<(), FunnelError> {
        let phone = {
            let mut state = self.state.write();
            let phone = match &*state {
                FunnelState::OtpVerification { lead, .. } => lead.phone.clone(),
                other => {
                    return Err(FunnelError::InvalidTransition {
                        stage: other.stage(),
                        event: "send_otp",
                    })
                }
            };
            let next = state.begin_otp_dispatch()?;
            *state = next;
            phone
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let weak_state = Arc::downgrade(&self.state);
        let funnel_id = self.id;
        let handle = tokio::spawn(async move {
            if let Err(e) = dispatcher.dispatch(&phone).await {
                tracing::warn!(funnel_id = %funnel_id, error = %e, "simulated OTP dispatch failed");
            }
            // The funnel may have been torn down while the simulated call
            // was sleeping; an upgrade failure means there is nothing left
            // to update.
            if let Some(state) = weak_state.upgrade() {
                let mut guard = state.write();
                if let Ok(next) = guard.complete_otp_dispatch() {
                    *guard = next;
                    tracing::debug!(funnel_id = %funnel_id, "simulated OTP dispatch complete");
                }
            }
        });

        if let Some(previous) = self.pending_dispatch.lock().replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    /// Await the in-flight dispatch, if any
    pub async fn wait_for_dispatch(&self) {
        let handle = self.pending_dispatch.lock().take();
        if let Some(handle) = handle {
            // An aborted or panicked dispatch task is not the caller's
            // failure; the state simply stays unsent.
            let _ = handle.await;
        }
    }

    /// `verify_otp`: check the submitted code and complete the funnel
    ///
    /// On a match: computes the score, transitions to `Result`, and hands
    /// the payload to the sink. On a mismatch: records the inline error
    /// and leaves the session re-submittable.
    pub async fn verify_otp(&self, code: &str) -> Result<ResultPayload, FunnelError> {
        let phone = {
            let state = self.state.read();
            match &*state {
                FunnelState::OtpVerification { lead, otp, .. } => {
                    if otp.loading {
                        return Err(FunnelError::DispatchInFlight);
                    }
                    if !otp.sent {
                        return Err(FunnelError::OtpNotSent);
                    }
                    lead.phone.clone()
                }
                other => {
                    return Err(FunnelError::InvalidTransition {
                        stage: other.stage(),
                        event: "verify_otp",
                    })
                }
            }
        };

        if self.verifier.verify(&phone, code).await {
            let payload = {
                let mut state = self.state.write();
                let payload = state.build_payload(&self.config.thresholds)?;
                *state = FunnelState::Result {
                    payload: payload.clone(),
                };
                payload
            };

            tracing::info!(
                funnel_id = %self.id,
                score = payload.score,
                category = payload.category.as_str(),
                "assessment completed"
            );

            // The hand-off is a log/record stand-in; a sink failure must
            // not undo the visitor's completed funnel.
            if let Err(e) = self.sink.submit(&payload).await {
                tracing::warn!(funnel_id = %self.id, error = %e, "result sink rejected payload");
            }

            Ok(payload)
        } else {
            let message = self.config.mismatch_error.clone();
            {
                let mut state = self.state.write();
                let next = state.fail_otp_verification(&message)?;
                *state = next;
            }
            tracing::debug!(funnel_id = %self.id, "OTP verification failed");
            Err(FunnelError::OtpMismatch { message })
        }
    }

    /// Share link inputs, once completed
    pub fn result(&self) -> Option<ResultPayload> {
        self.state.read().payload().cloned()
    }
}

impl Drop for Funnel {
    fn drop(&mut self) {
        // Cancel, not merely ignore, any in-flight simulated call
        if let Some(handle) = self.pending_dispatch.lock().take() {
            handle.abort();
        }
    }
}

/// Serializable view of one funnel for API responses
#[derive(Debug, Clone, Serialize)]
pub struct FunnelSnapshot {
    pub id: Uuid,
    pub stage: FunnelStage,
    /// 0-based index of the question being asked, while assessing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
    pub total_questions: usize,
    pub answered: usize,
    /// The question being asked, while assessing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    /// OTP session flags, while verifying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<OtpSession>,
    /// Final payload, once completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultPayload>,
}

impl FunnelSnapshot {
    fn of(id: Uuid, state: &FunnelState, questions: &QuestionSet) -> Self {
        let mut snapshot = Self {
            id,
            stage: state.stage(),
            current_index: None,
            total_questions: questions.len(),
            answered: state.answers().len(),
            question: None,
            otp: None,
            result: None,
        };

        match state {
            FunnelState::Assessment { current_index, .. } => {
                snapshot.current_index = Some(*current_index);
                snapshot.question = questions.get(*current_index).cloned();
            }
            FunnelState::OtpVerification { otp, .. } => {
                snapshot.otp = Some(otp.clone());
            }
            FunnelState::Result { payload } => {
                snapshot.result = Some(payload.clone());
            }
            FunnelState::Landing | FunnelState::LeadCapture { .. } => {}
        }

        snapshot
    }
}
