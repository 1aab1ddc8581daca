//! Server startup and graceful shutdown

use anyhow::{Context, Result};
use humanizer_core::Config;

use super::Application;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Application) -> Result<()> {
    let addr = config.bind_address();
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        environment = %config.environment,
        upload_dir = %config.upload_dir,
        backend = app.state.humanizer.name(),
        max_upload_mb = app.state.validator.max_file_size() / 1024 / 1024,
        "Server ready and accepting connections"
    );

    let result = axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    app.cleanup_handle.abort();
    tracing::info!("Upload cleanup task stopped");

    result?;
    Ok(())
}

/// Resolves on Ctrl+C (SIGINT) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
