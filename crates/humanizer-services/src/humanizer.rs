use async_trait::async_trait;
use humanizer_core::{HumanizeParameters, HumanizeResult, TransferMode};

/// Failures of a humanize backend.
#[derive(Debug, thiserror::Error)]
pub enum HumanizeError {
    #[error("Failed to connect to upstream API: {0}")]
    Connection(String),

    #[error("Upstream API request timed out: {0}")]
    Timeout(String),

    #[error("Upstream API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No response from upstream API: {0}")]
    NoResponse(String),

    #[error("Invalid response from upstream API: {0}")]
    InvalidResponse(String),

    #[error("Upstream request failed: {0}")]
    Request(String),
}

/// Rewrites text (or a whole document) according to [`HumanizeParameters`].
#[async_trait]
pub trait Humanizer: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    async fn humanize(
        &self,
        mode: TransferMode,
        params: &HumanizeParameters,
    ) -> Result<HumanizeResult, HumanizeError>;
}
