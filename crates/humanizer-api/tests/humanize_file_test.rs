//! `POST /api/v1/humanize-file` tests.

mod helpers;

use std::sync::Arc;

use helpers::{params_json, setup_test_app, setup_test_app_with, upload, RecordingHumanizer};
use humanizer_core::{Config, TransferMode};
use serde_json::{json, Value};

#[tokio::test]
async fn test_text_mode_when_text_supplied() {
    let recorder = Arc::new(RecordingHumanizer::default());
    let app = setup_test_app_with(recorder.clone(), Config::default()).await;

    let uploaded: Value = upload(app.client(), "a.txt", "text/plain", b"File body.".to_vec())
        .await
        .json();

    let response = app
        .client()
        .post("/api/v1/humanize-file")
        .json(&json!({
            "file_path": uploaded["file_path"],
            "text": "Edited text from the client.",
            "params": params_json("Neutral")
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        TransferMode::Text("Edited text from the client.".to_string())
    );
}

#[tokio::test]
async fn test_file_mode_when_text_blank() {
    let recorder = Arc::new(RecordingHumanizer::default());
    let app = setup_test_app_with(recorder.clone(), Config::default()).await;

    let uploaded: Value = upload(app.client(), "scan.txt", "text/plain", b"Raw bytes.".to_vec())
        .await
        .json();

    let response = app
        .client()
        .post("/api/v1/humanize-file")
        .json(&json!({
            "file_path": uploaded["file_path"],
            "text": "   ",
            "params": params_json("Friendly")
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["content"], "rewritten file: scan.txt");

    match &recorder.calls()[0] {
        TransferMode::File { filename, bytes } => {
            assert_eq!(filename, "scan.txt");
            assert_eq!(bytes, b"Raw bytes.");
        }
        other => panic!("expected file mode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_text_defaults_to_empty() {
    let recorder = Arc::new(RecordingHumanizer::default());
    let app = setup_test_app_with(recorder.clone(), Config::default()).await;

    let uploaded: Value = upload(app.client(), "b.txt", "text/plain", b"Body.".to_vec())
        .await
        .json();

    let response = app
        .client()
        .post("/api/v1/humanize-file")
        .json(&json!({
            "file_path": uploaded["file_path"],
            "params": params_json("Neutral")
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(recorder.calls()[0].is_file());
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let app = setup_test_app().await;
    let missing = app.state.store.base_path().join("1_missing.txt");

    let response = app
        .client()
        .post("/api/v1/humanize-file")
        .json(&json!({
            "file_path": missing.display().to_string(),
            "text": "",
            "params": params_json("Neutral")
        }))
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error_type"], "NotFound");
    assert!(body["details"].as_str().unwrap().contains("1_missing.txt"));
}

#[tokio::test]
async fn test_production_hides_error_details() {
    let config = Config {
        environment: "production".to_string(),
        ..Config::default()
    };
    let app = setup_test_app_with(Arc::new(RecordingHumanizer::default()), config).await;
    let missing = app.state.store.base_path().join("1_missing.txt");

    let response = app
        .client()
        .post("/api/v1/humanize-file")
        .json(&json!({
            "file_path": missing.display().to_string(),
            "params": params_json("Neutral")
        }))
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].as_str().unwrap().contains("1_missing.txt"));
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn test_path_outside_store_is_rejected() {
    let app = setup_test_app().await;

    for path in ["../../etc/passwd", "/etc/passwd"] {
        let response = app
            .client()
            .post("/api/v1/humanize-file")
            .json(&json!({
                "file_path": path,
                "text": "",
                "params": params_json("Neutral")
            }))
            .await;
        assert_eq!(response.status_code(), 400, "path {}", path);
    }
}

#[tokio::test]
async fn test_invalid_params_rejected_before_lookup() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v1/humanize-file")
        .json(&json!({
            "file_path": "1_whatever.txt",
            "text": "",
            "params": params_json("Custom")
        }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_delete_after_processing() {
    let recorder = Arc::new(RecordingHumanizer::default());
    let config = Config {
        delete_after_processing: true,
        ..Config::default()
    };
    let app = setup_test_app_with(recorder, config).await;

    let uploaded: Value = upload(app.client(), "c.txt", "text/plain", b"Body.".to_vec())
        .await
        .json();
    assert_eq!(app.stored_files(), 1);

    let response = app
        .client()
        .post("/api/v1/humanize-file")
        .json(&json!({
            "file_path": uploaded["file_path"],
            "text": "Body.",
            "params": params_json("Neutral")
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(app.stored_files(), 0);
}
