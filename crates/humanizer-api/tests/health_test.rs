//! Root and health endpoint tests.

mod helpers;

use helpers::setup_test_app;
use humanizer_api::constants::BODY_LIMIT_SLACK_BYTES;
use serde_json::Value;

#[tokio::test]
async fn test_root_banner() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["message"], "AI Text Humanizer API v1.0.0");
    assert_eq!(body["docs"], "/docs");
    assert_eq!(body["health"], "/health");
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "1.0.0");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/v1/humanize"));
    assert!(paths.contains_key("/api/v1/upload"));
    assert!(paths.contains_key("/api/v1/humanize-file"));
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/health")
        .add_header("Origin", "http://localhost:18200")
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://localhost:18200"
    );
}

#[tokio::test]
async fn test_body_over_transport_limit_rejected() {
    let app = setup_test_app().await;
    let limit = app.state.validator.max_file_size() + BODY_LIMIT_SLACK_BYTES;
    let body = "a".repeat(limit + 1);

    let response = app
        .client()
        .post("/api/v1/humanize")
        .add_header("Content-Length", body.len().to_string())
        .text(body)
        .await;
    assert_eq!(response.status_code(), 413);
}
