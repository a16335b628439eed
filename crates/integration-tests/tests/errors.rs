//! Error envelopes, request ids and rate limiting.

#![allow(clippy::unwrap_used)]

use reqwest::{Method, StatusCode};
use serde_json::json;

use backlink_vista_integration_tests::{PASSWORD, TestContext, body};
use backlink_vista_server::config::ServerConfig;

#[tokio::test]
async fn test_unknown_api_path() {
    let ctx = TestContext::new().await;
    let response = ctx.client.get(ctx.url("/api/unknown")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(response).await, json!({"message": "Resource not found"}));
}

#[tokio::test]
async fn test_malformed_json() {
    let ctx = TestContext::new().await;
    let response = ctx
        .request(Method::POST, "/api/auth/login", None)
        .header("content-type", "application/json")
        .body("{\"email\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body(response).await;
    assert_eq!(body["message"], "Invalid JSON");
    assert!(body["errors"]["body"].is_string());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new().await;
    let response = ctx
        .client
        .get(ctx.url("/api/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-me-123"
    );
}

#[tokio::test]
async fn test_login_is_rate_limited() {
    let ctx = TestContext::with_config(ServerConfig::default()).await;
    let attempt = json!({"email": "nobody@example.com", "password": PASSWORD});

    for _ in 0..5 {
        let response = ctx
            .send_json(Method::POST, "/api/auth/login", None, &attempt)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = ctx
        .send_json(Method::POST, "/api/auth/login", None, &attempt)
        .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Other routes are not limited
    let response = ctx.client.get(ctx.url("/api/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
