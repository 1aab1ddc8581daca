//! Service initialization and application state setup

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use humanizer_core::Config;
use humanizer_processing::UploadValidator;
use humanizer_services::{
    CleanupService, Humanizer, MockHumanizer, OpenAiConfig, OpenAiHumanizer,
};
use humanizer_storage::FileStore;

use crate::state::AppState;

/// Build the application state: upload store, validator and humanize backend.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let store = FileStore::new(&config.upload_dir)
        .await
        .context("Failed to initialize upload storage")?;
    tracing::info!(upload_dir = %store.base_path().display(), "Upload storage ready");

    let humanizer = build_humanizer(config)?;

    Ok(Arc::new(AppState::new(
        config.clone(),
        Arc::new(store),
        UploadValidator::default(),
        humanizer,
    )))
}

/// OpenAI when an API key is configured, the local mock otherwise.
pub fn build_humanizer(config: &Config) -> Result<Arc<dyn Humanizer>> {
    let humanizer: Arc<dyn Humanizer> = match config.openai_api_key() {
        Some(api_key) => {
            let client = OpenAiHumanizer::new(OpenAiConfig {
                api_key: api_key.to_string(),
                model: config.openai_model.clone(),
                api_url: config.openai_api_url.clone(),
                timeout: humanizer_services::openai::DEFAULT_TIMEOUT,
                context_window: config.model_context_window,
            })?;
            tracing::info!(
                model = %config.openai_model,
                max_input_tokens = config.max_input_tokens(),
                "Using OpenAI humanize backend"
            );
            Arc::new(client)
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, using mock humanize backend");
            Arc::new(MockHumanizer::new())
        }
    };

    Ok(humanizer)
}

/// Spawn the periodic upload cleanup task.
pub fn start_cleanup(config: &Config, state: &AppState) -> tokio::task::JoinHandle<()> {
    let interval = Duration::from_secs(config.upload_cleanup_interval_secs.max(1));
    let service = Arc::new(CleanupService::new(
        state.store.clone(),
        interval,
        config.upload_max_age(),
    ));

    tracing::info!(
        interval_secs = interval.as_secs(),
        max_age_hours = config.upload_max_age_hours,
        "Upload cleanup task started"
    );

    service.start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_without_api_key() {
        let config = Config::default();
        let humanizer = build_humanizer(&config).unwrap();
        assert_eq!(humanizer.name(), "mock");
    }

    #[test]
    fn test_openai_backend_with_api_key() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        let humanizer = build_humanizer(&config).unwrap();
        assert_eq!(humanizer.name(), "openai");
    }
}
