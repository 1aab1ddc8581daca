//! Configuration module
//!
//! Configuration is read once at startup from the environment (and an optional `.env`
//! file) into an immutable [`Config`] value that is handed to every component.

use std::env;

use crate::constants::{DEFAULT_CONTEXT_WINDOW, OUTPUT_TOKEN_RESERVE, PROMPT_OVERHEAD_RESERVE};

const DEFAULT_APP_NAME: &str = "AI Text Humanizer API";
const DEFAULT_APP_VERSION: &str = "1.0.0";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 18201;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:18200,http://127.0.0.1:18200";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_UPLOAD_MAX_AGE_HOURS: u64 = 24;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub log_format: String,
    // Upload storage
    pub upload_dir: String,
    pub upload_max_age_hours: u64,
    pub upload_cleanup_interval_secs: u64,
    pub delete_after_processing: bool,
    // Upstream model
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_api_url: String,
    pub model_context_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
            environment: "development".to_string(),
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
            cors_origins: parse_list(DEFAULT_CORS_ORIGINS),
            log_format: "compact".to_string(),
            upload_dir: DEFAULT_UPLOAD_DIR.to_string(),
            upload_max_age_hours: DEFAULT_UPLOAD_MAX_AGE_HOURS,
            upload_cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
            delete_after_processing: false,
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            model_context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

/// Split a comma-separated env value, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: &str, default: bool) -> bool {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}

impl Config {
    /// Load configuration from the environment and validate it.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            app_version: env::var("APP_VERSION").unwrap_or(defaults.app_version),
            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment)
                .to_lowercase(),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.cors_origins),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or(defaults.log_format)
                .to_lowercase(),
            upload_dir: env::var("UPLOAD_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.upload_dir),
            upload_max_age_hours: env::var("UPLOAD_MAX_AGE_HOURS")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_MAX_AGE_HOURS.to_string())
                .parse()
                .unwrap_or(DEFAULT_UPLOAD_MAX_AGE_HOURS),
            upload_cleanup_interval_secs: env::var("UPLOAD_CLEANUP_INTERVAL_SECS")
                .unwrap_or_else(|_| DEFAULT_CLEANUP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECS),
            delete_after_processing: env::var("DELETE_AFTER_PROCESSING")
                .map(|raw| parse_bool(&raw, false))
                .unwrap_or(false),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            openai_model: env::var("OPENAI_MODEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.openai_model),
            openai_api_url: env::var("OPENAI_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.openai_api_url),
            model_context_window: env::var("MODEL_CONTEXT_WINDOW")
                .unwrap_or_else(|_| DEFAULT_CONTEXT_WINDOW.to_string())
                .parse()
                .unwrap_or(DEFAULT_CONTEXT_WINDOW),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be a non-zero port number"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS must list explicit origins in production, '*' is not allowed"
            ));
        }

        if self.model_context_window <= OUTPUT_TOKEN_RESERVE + PROMPT_OVERHEAD_RESERVE {
            return Err(anyhow::anyhow!(
                "MODEL_CONTEXT_WINDOW must be larger than {} tokens",
                OUTPUT_TOKEN_RESERVE + PROMPT_OVERHEAD_RESERVE
            ));
        }

        if !self.openai_api_url.starts_with("http://") && !self.openai_api_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!("OPENAI_API_URL must be an http(s) URL"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref()
    }

    /// Maximum number of input tokens that may be forwarded upstream.
    pub fn max_input_tokens(&self) -> usize {
        self.model_context_window
            .saturating_sub(OUTPUT_TOKEN_RESERVE + PROMPT_OVERHEAD_RESERVE)
    }

    pub fn upload_max_age(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.upload_max_age_hours * 3600)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
