//! Admin route guard and login/logout operations
//!
//! The guard gates every admin route on the persisted session flag:
//!
//! - flag set + login route: redirect to the admin home
//! - flag absent + any other admin route: redirect to the login route
//! - otherwise: serve the requested route
//!
//! The flag is presentational gating, not authorization; the guard only
//! consumes the [`funnel_core::AdminSessionStore`] and
//! [`funnel_core::CredentialVerifier`] seams, so a real identity backend
//! can be substituted without touching this logic.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use funnel_config::constants::{admin, routes};

use crate::metrics::record_login;
use crate::state::AppState;

/// Route-level admin gate
pub async fn admin_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    // A storage failure reads as "not authenticated": the safe verdict
    let authenticated = state
        .admin_sessions
        .is_authenticated()
        .await
        .unwrap_or(false);

    let is_login_route = req.uri().path() == routes::ADMIN_LOGIN;

    if authenticated && is_login_route {
        return Redirect::temporary(routes::ADMIN_HOME).into_response();
    }
    if !authenticated && !is_login_route {
        return Redirect::temporary(routes::ADMIN_LOGIN).into_response();
    }

    next.run(req).await
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authenticated: bool,
    pub redirect: &'static str,
}

/// Inline error body
#[derive(Debug, Serialize)]
pub struct AuthError {
    pub error: String,
}

/// `POST /admin/login`
///
/// Compares against the injected credential verifier after the simulated
/// backend delay; a mismatch surfaces the fixed inline message and leaves
/// retry open (no lockout, no attempt counter).
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Response {
    tokio::time::sleep(state.login_delay()).await;

    if state
        .credentials
        .verify(&request.email, &request.password)
        .await
    {
        if let Err(e) = state.admin_sessions.set_authenticated().await {
            tracing::error!(error = %e, "failed to persist admin session flag");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AuthError {
                    error: "session store unavailable".to_string(),
                }),
            )
                .into_response();
        }

        record_login(true);
        tracing::info!(email = %request.email, "admin login succeeded");
        (
            StatusCode::OK,
            Json(LoginResponse {
                authenticated: true,
                redirect: routes::ADMIN_HOME,
            }),
        )
            .into_response()
    } else {
        record_login(false);
        tracing::warn!(email = %request.email, "admin login rejected");
        (
            StatusCode::UNAUTHORIZED,
            Json(AuthError {
                error: admin::LOGIN_ERROR.to_string(),
            }),
        )
            .into_response()
    }
}

/// `POST /admin/logout`
///
/// Clears the flag and points the client back at the login route.
/// Synchronous, no confirmation step.
pub async fn logout(State(state): State<AppState>) -> Response {
    if let Err(e) = state.admin_sessions.clear().await {
        tracing::error!(error = %e, "failed to clear admin session flag");
    }
    tracing::info!("admin logged out");
    Redirect::temporary(routes::ADMIN_LOGIN).into_response()
}

/// Session status body
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
}

/// `GET /admin/session`
///
/// The guard's verdict for the current client, for callers that render
/// their own loading state before showing admin content.
pub async fn session_status(State(state): State<AppState>) -> Json<SessionStatus> {
    let authenticated = state
        .admin_sessions
        .is_authenticated()
        .await
        .unwrap_or(false);
    Json(SessionStatus { authenticated })
}
