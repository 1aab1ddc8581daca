//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p humanizer-api`.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use humanizer_api::setup::routes;
use humanizer_api::state::AppState;
use humanizer_core::{Config, HumanizeParameters, HumanizeResult, TransferMode};
use humanizer_processing::UploadValidator;
use humanizer_services::{HumanizeError, Humanizer, MockHumanizer};
use humanizer_storage::FileStore;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Backend that remembers what it was asked to rewrite.
#[derive(Default)]
pub struct RecordingHumanizer {
    pub calls: Mutex<Vec<TransferMode>>,
}

impl RecordingHumanizer {
    pub fn calls(&self) -> Vec<TransferMode> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Humanizer for RecordingHumanizer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn humanize(
        &self,
        mode: TransferMode,
        _params: &HumanizeParameters,
    ) -> Result<HumanizeResult, HumanizeError> {
        let content = match &mode {
            TransferMode::Text(text) => format!("rewritten: {}", text.len()),
            TransferMode::File { filename, .. } => format!("rewritten file: {}", filename),
        };
        self.calls.lock().unwrap().push(mode);
        Ok(HumanizeResult::new(content, 1))
    }
}

/// Backend that always fails like an unreachable upstream.
pub struct FailingHumanizer;

#[async_trait]
impl Humanizer for FailingHumanizer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn humanize(
        &self,
        _mode: TransferMode,
        _params: &HumanizeParameters,
    ) -> Result<HumanizeResult, HumanizeError> {
        Err(HumanizeError::Connection("connection refused".to_string()))
    }
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of regular files in the upload directory.
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.state.store.base_path())
            .map(|entries| entries.filter_map(Result::ok).filter(|e| e.path().is_file()).count())
            .unwrap_or(0)
    }
}

/// Setup test app backed by the delay-free mock.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Arc::new(MockHumanizer::without_delay()), Config::default()).await
}

/// Setup test app with a specific backend and config; the upload dir is always a fresh temp dir.
pub async fn setup_test_app_with(humanizer: Arc<dyn Humanizer>, config: Config) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = Config {
        upload_dir: temp_dir.path().display().to_string(),
        ..config
    };

    let store = FileStore::new(temp_dir.path())
        .await
        .expect("Failed to create file store");

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(store),
        UploadValidator::default(),
        humanizer,
    ));

    let app = routes::setup_routes(&config, state.clone()).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

pub fn params_json(style: &str) -> Value {
    json!({
        "length": "Normal",
        "similarity": "Moderate",
        "style": style
    })
}

/// Upload `content` as `filename` and return the parsed response body.
pub async fn upload(client: &TestServer, filename: &str, mime: &str, content: Vec<u8>) -> axum_test::TestResponse {
    let part = Part::bytes(content).file_name(filename).mime_type(mime);
    let multipart = MultipartForm::new().add_part("file", part);
    client.post("/api/v1/upload").multipart(multipart).await
}

/// ASCII sentence text of exactly `len` characters.
pub fn text_of_len(len: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}
