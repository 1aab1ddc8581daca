use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of `POST /api/v1/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Sanitized original filename
    pub filename: String,
    /// Extracted text, empty when the document carries no text layer
    pub text: String,
    /// Original file content, base64-encoded
    pub base64: String,
    /// File size in bytes
    pub size: u64,
    /// Number of characters in `text`
    pub chars: usize,
    /// Storage path to pass to `/api/v1/humanize-file`
    pub file_path: String,
}
