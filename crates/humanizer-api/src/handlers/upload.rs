use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use base64::Engine;
use humanizer_core::{AppError, UploadResponse};
use humanizer_processing::extract_text;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, sanitize_filename};

/// Store a document and return its extracted text.
///
/// Validation runs before anything is written. A document that fails to parse is removed
/// again so the upload directory only holds files a later `/humanize-file` call can use.
#[utoipa::path(
    post,
    path = "/api/v1/upload",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document stored and text extracted", body = UploadResponse),
        (status = 400, description = "Invalid file or unparseable document", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (file_data, original_filename, content_type) = extract_multipart_file(multipart).await?;

    let filename = sanitize_filename(&original_filename)?;
    let extension = state.validator.validate(&filename, file_data.len())?;

    tracing::info!(
        filename = %filename,
        extension = %extension,
        content_type = %content_type,
        size_bytes = file_data.len(),
        "Document upload accepted"
    );

    let stored_path = state.store.save(&filename, &file_data).await?;

    let extract_name = filename.clone();
    let (file_data, extracted) = tokio::task::spawn_blocking(move || {
        let extracted = extract_text(&extract_name, &file_data);
        (file_data, extracted)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))?;

    let text = match extracted {
        Ok(text) => text,
        Err(e) => {
            if let Err(remove_err) = state.store.remove(&stored_path).await {
                tracing::warn!(
                    path = %stored_path.display(),
                    error = %remove_err,
                    "Failed to remove unparseable upload"
                );
            }
            return Err(e.into());
        }
    };

    if text.is_empty() {
        tracing::info!(filename = %filename, "No text extracted, file mode will be used");
    }

    let response = UploadResponse {
        chars: text.chars().count(),
        base64: base64::engine::general_purpose::STANDARD.encode(&file_data),
        size: file_data.len() as u64,
        file_path: stored_path.display().to_string(),
        filename,
        text,
    };

    Ok(Json(response))
}
