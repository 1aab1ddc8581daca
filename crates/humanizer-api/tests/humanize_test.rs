//! `POST /api/v1/humanize` tests.

mod helpers;

use std::sync::Arc;

use helpers::{params_json, setup_test_app, setup_test_app_with, text_of_len, FailingHumanizer};
use humanizer_core::Config;
use serde_json::{json, Value};

#[tokio::test]
async fn test_humanize_text_success() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v1/humanize")
        .json(&json!({
            "source": {"mode": "text", "text": text_of_len(310)},
            "params": params_json("Neutral")
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let content = body["content"].as_str().unwrap();
    assert!(!content.is_empty());
    assert_eq!(body["chars"].as_u64().unwrap() as usize, content.len());
    assert!(body["processingTime"].as_u64().is_some());
    assert!(body.get("truncated").is_none());
}

#[tokio::test]
async fn test_text_length_bounds() {
    let app = setup_test_app().await;

    for (len, expected) in [(299, 400), (300, 200), (5000, 200), (5001, 400)] {
        let response = app
            .client()
            .post("/api/v1/humanize")
            .json(&json!({
                "source": {"mode": "text", "text": text_of_len(len)},
                "params": params_json("Academic")
            }))
            .await;
        assert_eq!(response.status_code(), expected, "length {}", len);
    }
}

#[tokio::test]
async fn test_document_mode_skips_length_bounds() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v1/humanize")
        .json(&json!({
            "source": {"mode": "document", "text": "Short extracted text."},
            "params": params_json("Business")
        }))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_custom_style_validation() {
    let app = setup_test_app().await;
    let source = json!({"mode": "text", "text": text_of_len(400)});

    let missing = app
        .client()
        .post("/api/v1/humanize")
        .json(&json!({"source": source, "params": params_json("Custom")}))
        .await;
    assert_eq!(missing.status_code(), 400);
    let body: Value = missing.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("customStyle"));

    let too_long = app
        .client()
        .post("/api/v1/humanize")
        .json(&json!({
            "source": source,
            "params": {"length": "Normal", "similarity": "High", "style": "Custom", "customStyle": "x".repeat(121)}
        }))
        .await;
    assert_eq!(too_long.status_code(), 400);

    let ok = app
        .client()
        .post("/api/v1/humanize")
        .json(&json!({
            "source": source,
            "params": {"length": "Normal", "similarity": "High", "style": "Custom", "customStyle": "Like a pirate"}
        }))
        .await;
    assert_eq!(ok.status_code(), 200);
    let body: Value = ok.json();
    assert!(body["content"].as_str().unwrap().starts_with("[Like a pirate] "));
}

#[tokio::test]
async fn test_unknown_enum_value_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v1/humanize")
        .json(&json!({
            "source": {"mode": "text", "text": text_of_len(400)},
            "params": {"length": "Huge", "similarity": "High", "style": "Neutral"}
        }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upstream_failure_is_server_error() {
    let app = setup_test_app_with(Arc::new(FailingHumanizer), Config::default()).await;

    let response = app
        .client()
        .post("/api/v1/humanize")
        .json(&json!({
            "source": {"mode": "text", "text": text_of_len(400)},
            "params": params_json("Neutral")
        }))
        .await;
    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert_eq!(body["recoverable"], true);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}
