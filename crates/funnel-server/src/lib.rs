//! Assessment funnel server
//!
//! HTTP endpoints for the public funnel flow and the guarded admin panel.

pub mod auth;
pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use auth::admin_guard;
pub use http::create_router;
pub use metrics::{
    init_metrics, record_funnel_completed, record_funnel_started, record_login,
    record_otp_dispatch,
};
pub use session::{Session, SessionManager};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session capacity reached")]
    Capacity,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<funnel_core::Error> for ServerError {
    fn from(err: funnel_core::Error) -> Self {
        ServerError::Storage(err.to_string())
    }
}
