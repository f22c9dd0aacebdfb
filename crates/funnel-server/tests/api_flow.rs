//! End-to-end API tests driving a funnel through every stage.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

use funnel_config::{DomainConfig, Settings};
use funnel_server::{create_router, AppState};

fn test_router() -> Router {
    let mut config = Settings::default();
    // Simulated latency would only slow the tests down
    config.simulation.otp_dispatch_ms = 0;
    config.simulation.login_ms = 0;
    let state = AppState::new(config, DomainConfig::default()).unwrap();
    create_router(state)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Poll the funnel until the simulated dispatch lands
async fn wait_until_otp_sent(router: &Router, id: &str) -> Value {
    for _ in 0..100 {
        let (status, body) = send(router, Method::GET, &format!("/api/funnel/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        if body["otp"]["sent"].as_bool() == Some(true) {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("simulated OTP dispatch never completed");
}

#[tokio::test]
async fn test_full_funnel_over_http() {
    let router = test_router();

    let (status, body) = send(&router, Method::POST, "/api/funnel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "LANDING");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/start"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "ASSESSMENT");
    assert_eq!(body["current_index"], 0);

    // Always choose the last option (the highest-point answer in the
    // default bank)
    let total = body["total_questions"].as_u64().unwrap();
    let mut body = body;
    for _ in 0..total {
        let options = body["question"]["options"].as_array().unwrap().len();
        let (status, next) = send(
            &router,
            Method::POST,
            &format!("/api/funnel/{id}/answer"),
            Some(serde_json::json!({ "optionIndex": options - 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body = next;
    }
    assert_eq!(body["stage"], "LEAD_CAPTURE");

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/lead"),
        Some(serde_json::json!({ "name": "Budi", "phone": "08123456789" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "OTP_VERIFICATION");

    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/otp/send"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    wait_until_otp_sent(&router, &id).await;

    // The demo code completes the funnel with the maximum score
    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/otp/verify"),
        Some(serde_json::json!({ "code": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "RESULT");
    assert_eq!(body["result"]["score"], 100);
    assert_eq!(body["result"]["category"], "fully_protected");

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/api/funnel/{id}/share-link"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/"));
    assert!(url.contains("100"));
}

#[tokio::test]
async fn test_wrong_code_surfaces_demo_hint() {
    let router = test_router();

    let (_, body) = send(&router, Method::POST, "/api/funnel", None).await;
    let id = body["id"].as_str().unwrap().to_string();

    send(&router, Method::POST, &format!("/api/funnel/{id}/start"), None).await;
    for _ in 0..5 {
        send(
            &router,
            Method::POST,
            &format!("/api/funnel/{id}/answer"),
            Some(serde_json::json!({ "optionIndex": 0 })),
        )
        .await;
    }
    send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/lead"),
        Some(serde_json::json!({ "name": "Sari", "phone": "0812" })),
    )
    .await;
    send(&router, Method::POST, &format!("/api/funnel/{id}/otp/send"), None).await;
    wait_until_otp_sent(&router, &id).await;

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/otp/verify"),
        Some(serde_json::json!({ "code": "000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid OTP. For demo, use 123456.");

    // The session remains verifiable
    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/otp/verify"),
        Some(serde_json::json!({ "code": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_out_of_order_events_conflict() {
    let router = test_router();

    let (_, body) = send(&router, Method::POST, "/api/funnel", None).await;
    let id = body["id"].as_str().unwrap().to_string();

    // Answering on the landing stage is rejected without advancing
    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/answer"),
        Some(serde_json::json!({ "optionIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&router, Method::GET, &format!("/api/funnel/{id}"), None).await;
    assert_eq!(body["stage"], "LANDING");
}

#[tokio::test]
async fn test_admin_login_flow() {
    let router = test_router();

    // Wrong password gets the fixed inline error
    let (status, body) = send(
        &router,
        Method::POST,
        "/admin/login",
        Some(serde_json::json!({ "email": "admin@siaptenang.id", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["error"],
        "Email atau password yang Anda masukkan salah."
    );

    // Unauthenticated admin reads redirect to the login route
    let (status, _) = send(&router, Method::GET, "/admin/contacts", None).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);

    let (status, body) = send(
        &router,
        Method::POST,
        "/admin/login",
        Some(serde_json::json!({ "email": "admin@siaptenang.id", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["redirect"], "/admin");

    let (status, body) = send(&router, Method::GET, "/admin/contacts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, body) = send(&router, Method::GET, "/admin/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);

    // An authenticated client hitting the login route is sent home
    let (status, _) = send(
        &router,
        Method::POST,
        "/admin/login",
        Some(serde_json::json!({ "email": "admin@siaptenang.id", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);

    // Logout clears the flag and the guard closes again
    let (status, _) = send(&router, Method::POST, "/admin/logout", None).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    let (_, body) = send(&router, Method::GET, "/admin/session", None).await;
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn test_admin_sees_sessions_and_dispatch_history() {
    let router = test_router();

    let (_, body) = send(&router, Method::POST, "/api/funnel", None).await;
    let id = body["id"].as_str().unwrap().to_string();

    send(&router, Method::POST, &format!("/api/funnel/{id}/start"), None).await;
    for _ in 0..5 {
        send(
            &router,
            Method::POST,
            &format!("/api/funnel/{id}/answer"),
            Some(serde_json::json!({ "optionIndex": 1 })),
        )
        .await;
    }
    send(
        &router,
        Method::POST,
        &format!("/api/funnel/{id}/lead"),
        Some(serde_json::json!({ "name": "Budi", "phone": "08123456789" })),
    )
    .await;
    send(&router, Method::POST, &format!("/api/funnel/{id}/otp/send"), None).await;
    wait_until_otp_sent(&router, &id).await;

    let (status, _) = send(
        &router,
        Method::POST,
        "/admin/login",
        Some(serde_json::json!({ "email": "admin@siaptenang.id", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, Method::GET, "/admin/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["sessions"][0]["id"], id.as_str());
    assert_eq!(body["sessions"][0]["stage"], "OTP Verification");

    let (status, body) = send(&router, Method::GET, "/admin/otp-log/08123456789", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["dispatches"][0]["status"], "simulated_sent");
    assert!(body["dispatches"][0]["sent_at"].is_string());

    // An unknown number has no history
    let (_, body) = send(&router, Method::GET, "/admin/otp-log/000", None).await;
    assert_eq!(body["count"], 0);
}
