//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use humanizer_core::Config;

use crate::state::AppState;

/// Everything `start_server` needs to run.
pub struct Application {
    pub state: Arc<AppState>,
    pub router: Router,
    pub cleanup_handle: tokio::task::JoinHandle<()>,
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<Application> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry(&config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        app = %config.app_name,
        version = %config.app_version,
        "Configuration loaded and validated successfully"
    );

    let state = services::initialize_services(&config).await?;
    let cleanup_handle = services::start_cleanup(&config, &state);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok(Application {
        state,
        router,
        cleanup_handle,
    })
}
