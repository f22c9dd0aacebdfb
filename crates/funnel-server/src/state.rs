//! Application state
//!
//! Shared state across all handlers. Demo wiring lives here: the fixed
//! verifiers and simulated gateway are constructed from the centralized
//! constants, and every seam is an `Arc<dyn Trait>` a real backend could
//! replace.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use funnel_config::{constants, DomainConfig, Settings};
use funnel_core::{
    AdminSessionStore, CredentialVerifier, DispatchAudit, FixedCredentialVerifier, QuestionSet,
};
use funnel_engine::{Funnel, FunnelRuntimeConfig, SimulatedOtpGateway};
use funnel_persistence::{MemoryAdminSessionStore, OtpDispatchLog, RecordingResultSink};

use crate::session::SessionManager;
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration behind a lock for hot-reload style access
    pub config: Arc<RwLock<Settings>>,
    /// Domain content (questions, thresholds, messaging)
    pub domain: Arc<DomainConfig>,
    /// The validated question bank served to visitors
    pub questions: Arc<QuestionSet>,
    /// Funnel session registry
    pub sessions: Arc<SessionManager>,
    /// Admin session flag store
    pub admin_sessions: Arc<dyn AdminSessionStore>,
    /// Admin credential check
    pub credentials: Arc<dyn CredentialVerifier>,
    /// Captured assessment payloads (webhook stand-in)
    pub sink: Arc<RecordingResultSink>,
    /// Simulated OTP dispatch audit trail
    pub otp_log: Arc<OtpDispatchLog>,
    /// Simulated OTP gateway shared by all funnels
    gateway: Arc<SimulatedOtpGateway>,
}

impl AppState {
    /// Build state with demo wiring and an in-memory admin session store
    pub fn new(config: Settings, domain: DomainConfig) -> Result<Self, ServerError> {
        let store = Arc::new(MemoryAdminSessionStore::new(
            constants::admin::SESSION_FLAG_KEY,
        ));
        Self::with_admin_session_store(config, domain, store)
    }

    /// Build state with a caller-provided admin session store
    pub fn with_admin_session_store(
        config: Settings,
        domain: DomainConfig,
        admin_sessions: Arc<dyn AdminSessionStore>,
    ) -> Result<Self, ServerError> {
        let questions = Arc::new(
            domain
                .questions
                .to_question_set()
                .map_err(|e| ServerError::Internal(e.to_string()))?,
        );

        let otp_log = Arc::new(OtpDispatchLog::new());
        let gateway = Arc::new(
            SimulatedOtpGateway::new(
                constants::otp::DEMO_ACCEPTED_CODE,
                Duration::from_millis(config.simulation.otp_dispatch_ms),
            )
            .with_audit(Arc::clone(&otp_log) as Arc<dyn DispatchAudit>),
        );

        let credentials = Arc::new(FixedCredentialVerifier::new(
            constants::admin::DEMO_EMAIL,
            constants::admin::DEMO_PASSWORD,
        ));

        let sessions = Arc::new(SessionManager::new(config.sessions.max_sessions));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            domain: Arc::new(domain),
            questions,
            sessions,
            admin_sessions,
            credentials,
            sink: Arc::new(RecordingResultSink::new()),
            otp_log,
            gateway,
        })
    }

    /// Construct a fresh funnel wired to the shared seams
    pub fn new_funnel(&self) -> Funnel {
        Funnel::new(
            Arc::clone(&self.questions),
            FunnelRuntimeConfig {
                thresholds: self.domain.scoring.to_thresholds(),
                mismatch_error: constants::otp::MISMATCH_ERROR.to_string(),
            },
            Arc::clone(&self.gateway) as _,
            Arc::clone(&self.gateway) as _,
            Arc::clone(&self.sink) as _,
        )
    }

    /// Simulated login backend duration
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.config.read().simulation.login_ms)
    }

    /// Idle timeout for funnel sessions
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.config.read().sessions.idle_timeout_secs)
    }
}
