//! HTTP Endpoints
//!
//! REST API for the assessment funnel and the guarded admin panel.
//!
//! Public routes drive one funnel session through its stages; admin routes
//! sit behind [`crate::auth::admin_guard`] except for the login action and
//! the session status probe, which the guard's redirect rules depend on.

use axum::{
    extract::{Json, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use funnel_engine::{FunnelError, FunnelSnapshot};

use crate::auth;
use crate::metrics::{
    metrics_handler, record_funnel_completed, record_funnel_started, record_otp_dispatch,
};
use crate::session::Session;
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    drop(config); // Release lock before building router

    let admin_routes = Router::new()
        .route("/admin", get(admin_summary))
        .route("/admin/contacts", get(list_contacts))
        .route("/admin/contacts/:id", get(get_contact))
        .route("/admin/sessions", get(list_sessions))
        .route("/admin/otp-log/:phone", get(otp_dispatch_history))
        .route("/admin/login", post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::admin_guard,
        ))
        // The status probe stays outside the guard so clients can ask
        // "would I be redirected?" without being redirected.
        .route("/admin/session", get(auth::session_status));

    Router::new()
        // Funnel session endpoints
        .route("/api/funnel", post(create_funnel))
        .route("/api/funnel/:id", get(get_funnel))
        .route("/api/funnel/:id", delete(delete_funnel))
        // Funnel events
        .route("/api/funnel/:id/start", post(start_assessment))
        .route("/api/funnel/:id/answer", post(answer_question))
        .route("/api/funnel/:id/lead", post(submit_lead))
        .route("/api/funnel/:id/otp/send", post(send_otp))
        .route("/api/funnel/:id/otp/verify", post(verify_otp))
        .route("/api/funnel/:id/share-link", get(share_link))
        // Question bank
        .route("/api/questions", get(list_questions))
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    // Credentialed CORS forbids wildcard headers; name what the API takes
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Inline error body
#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map funnel outcomes to HTTP statuses
///
/// Bad input (invalid option, empty field, wrong code) is 422; an event
/// fired in the wrong state or at the wrong time is 409.
fn funnel_error_response(err: FunnelError) -> Response {
    let status = match err {
        FunnelError::Validation { .. }
        | FunnelError::InvalidOption { .. }
        | FunnelError::OtpMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        FunnelError::InvalidTransition { .. }
        | FunnelError::OtpNotSent
        | FunnelError::DispatchInFlight => StatusCode::CONFLICT,
    };
    error_response(status, err.to_string())
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Capacity => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Storage(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        error_response(status, self.to_string())
    }
}

fn lookup(state: &AppState, id: Uuid) -> Result<std::sync::Arc<Session>, ServerError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
}

/// Create a new funnel session
async fn create_funnel(State(state): State<AppState>) -> Result<Json<FunnelSnapshot>, ServerError> {
    let session = state.sessions.create(state.new_funnel())?;
    tracing::info!(funnel_id = %session.id(), "funnel session created");
    Ok(Json(session.funnel.snapshot()))
}

/// Get funnel session state
async fn get_funnel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FunnelSnapshot>, ServerError> {
    let session = lookup(&state, id)?;
    session.touch();
    Ok(Json(session.funnel.snapshot()))
}

/// Delete funnel session
async fn delete_funnel(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.sessions.remove(id) {
        tracing::info!(funnel_id = %id, "funnel session removed");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Begin the assessment
async fn start_assessment(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let session = match lookup(&state, id) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };
    session.touch();

    match session.funnel.start() {
        Ok(()) => {
            record_funnel_started();
            Json(session.funnel.snapshot()).into_response()
        }
        Err(e) => funnel_error_response(e),
    }
}

/// Answer request body
#[derive(Debug, Deserialize)]
struct AnswerRequest {
    #[serde(rename = "optionIndex")]
    option_index: usize,
}

/// Record the selected option for the current question
async fn answer_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Response {
    let session = match lookup(&state, id) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };
    session.touch();

    match session.funnel.answer(request.option_index) {
        Ok(()) => Json(session.funnel.snapshot()).into_response(),
        Err(e) => funnel_error_response(e),
    }
}

/// Lead request body
#[derive(Debug, Deserialize)]
struct LeadRequest {
    name: String,
    phone: String,
}

/// Capture contact identity
async fn submit_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LeadRequest>,
) -> Response {
    let session = match lookup(&state, id) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };
    session.touch();

    match session.funnel.submit_lead(&request.name, &request.phone) {
        Ok(()) => Json(session.funnel.snapshot()).into_response(),
        Err(e) => funnel_error_response(e),
    }
}

/// Begin a simulated OTP dispatch
async fn send_otp(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let session = match lookup(&state, id) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };
    session.touch();

    match session.funnel.send_otp() {
        Ok(()) => {
            record_otp_dispatch();
            (StatusCode::ACCEPTED, Json(session.funnel.snapshot())).into_response()
        }
        Err(e) => funnel_error_response(e),
    }
}

/// Verify request body
#[derive(Debug, Deserialize)]
struct VerifyRequest {
    code: String,
}

/// Check the submitted code and complete the funnel
async fn verify_otp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<VerifyRequest>,
) -> Response {
    let session = match lookup(&state, id) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };
    session.touch();

    match session.funnel.verify_otp(&request.code).await {
        Ok(payload) => {
            record_funnel_completed(payload.category.as_str());
            Json(session.funnel.snapshot()).into_response()
        }
        Err(e) => funnel_error_response(e),
    }
}

/// Share link response
#[derive(Debug, Serialize)]
struct ShareLinkResponse {
    url: String,
}

/// Consultation deep link for a completed funnel
async fn share_link(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let session = match lookup(&state, id) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };
    session.touch();

    match session.funnel.result() {
        Some(payload) => {
            let url = state.domain.messaging.share_link(
                &payload.lead.name,
                payload.score,
                payload.category,
            );
            Json(ShareLinkResponse { url }).into_response()
        }
        None => error_response(
            StatusCode::CONFLICT,
            "Funnel has not reached a result yet".to_string(),
        ),
    }
}

/// The question bank served to visitors
async fn list_questions(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "questions": state.questions.questions(),
        "maxScore": state.questions.max_score(),
    }))
}

/// Admin dashboard summary
async fn admin_summary(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "activeSessions": state.sessions.len(),
        "capturedContacts": state.sink.len(),
        "otpDispatches": state.otp_log.len(),
    }))
}

/// Active funnel sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions: Vec<serde_json::Value> = state
        .sessions
        .list_ids()
        .into_iter()
        .filter_map(|id| state.sessions.get(id))
        .map(|s| {
            serde_json::json!({
                "id": s.id(),
                "stage": s.funnel.stage().display_name(),
                "ageSecs": s.age().as_secs(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Simulated dispatch history for one phone number
async fn otp_dispatch_history(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Json<serde_json::Value> {
    let dispatches = state.otp_log.for_phone(&phone);
    Json(serde_json::json!({
        "phone": phone,
        "count": dispatches.len(),
        "dispatches": dispatches,
    }))
}

/// Captured contacts, newest first
async fn list_contacts(State(state): State<AppState>) -> Json<serde_json::Value> {
    let contacts = state.sink.list();
    Json(serde_json::json!({
        "contacts": contacts,
        "count": contacts.len(),
    }))
}

/// One captured contact by id
async fn get_contact(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.sink.get(id) {
        Some(contact) => Json(contact).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Contact not found: {id}")),
    }
}

/// Liveness check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "questions": state.questions.len(),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    // Everything is in-process; not-ready only means an empty question bank
    let ready = !state.questions.questions().is_empty();
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "sessions": state.sessions.len(),
        })),
    )
}
