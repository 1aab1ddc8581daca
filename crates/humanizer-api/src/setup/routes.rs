//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use humanizer_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, BODY_LIMIT_SLACK_BYTES, DOCS_PATH, HEALTH_PATH, OPENAPI_JSON_PATH};
use crate::error;
use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = state.validator.max_file_size() + BODY_LIMIT_SLACK_BYTES;

    let api_routes = Router::new()
        .route("/humanize", post(handlers::humanize::humanize_text))
        .route("/upload", post(handlers::upload::upload_document))
        .route(
            "/humanize-file",
            post(handlers::humanize_file::humanize_file),
        );

    let mut app = Router::new()
        .route("/", get(handlers::health::root))
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .nest(API_PREFIX, api_routes)
        .with_state(state)
        .route(OPENAPI_JSON_PATH, get(|| async { Json(ApiDoc::openapi()) }))
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_JSON_PATH).path(DOCS_PATH));

    if !config.is_production() {
        app = app.layer(axum::middleware::from_fn(error::expose_error_details));
    }

    let app = app
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::debug!(body_limit_bytes = body_limit, "Routes configured");

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
