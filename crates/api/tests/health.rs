//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use cameo_api::router::MAX_BODY_BYTES;
use common::{body_json, get, post_json, send, FakeGenerator};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app(Arc::new(FakeGenerator::new())).await;
    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["credential_configured"], true);
}

// ---------------------------------------------------------------------------
// Test: missing credential reports degraded, still 200
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_reports_missing_credential() {
    let app = common::build_test_app(Arc::new(FakeGenerator::without_credential())).await;
    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["credential_configured"], false);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(Arc::new(FakeGenerator::new())).await;
    let response = get(&app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(Arc::new(FakeGenerator::new())).await;
    let response = get(&app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight from the configured origin is allowed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = common::build_test_app(Arc::new(FakeGenerator::new())).await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/characters")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:5173"
    );
}

// ---------------------------------------------------------------------------
// Test: bodies over the size cap are refused before reaching a handler
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_body_returns_413_without_generating() {
    let generator = Arc::new(FakeGenerator::new().then_image("Rk9Y"));
    let app = common::build_test_app(generator.clone()).await;
    let prompt = "a".repeat(MAX_BODY_BYTES);

    let response = post_json(
        &app,
        "/api/v1/flows/character/generate",
        json!({ "prompt": prompt }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(generator.prompts().is_empty());
}
