use humanizer_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, storage, services, routes)
    let app = humanizer_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    humanizer_api::setup::server::start_server(&config, app).await?;

    Ok(())
}
