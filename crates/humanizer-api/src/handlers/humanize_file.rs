use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::IntoResponse, Json};
use humanizer_core::{HumanizeFileRequest, HumanizeResult, TransferMode};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Rewrite a previously uploaded document.
///
/// Non-blank `text` is rewritten directly; otherwise the stored file itself is sent upstream.
#[utoipa::path(
    post,
    path = "/api/v1/humanize-file",
    tag = "humanize",
    request_body = HumanizeFileRequest,
    responses(
        (status = 200, description = "Rewritten text", body = HumanizeResult),
        (status = 400, description = "Invalid parameters or file path", body = ErrorResponse),
        (status = 404, description = "Uploaded file not found", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(file_path = %request.file_path))]
pub async fn humanize_file(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<HumanizeFileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.params.validate()?;

    let path = state.store.resolve(&request.file_path).await?;
    let bytes = state.store.read(&path).await?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(stored_to_original_name)
        .unwrap_or_default()
        .to_string();

    let mode = TransferMode::select(request.text, filename, bytes);
    tracing::debug!(mode = mode.kind(), backend = state.humanizer.name(), "Dispatching humanize request");

    let start = Instant::now();
    let result = state.humanizer.humanize(mode, &request.params).await?;

    if state.config.delete_after_processing {
        if let Err(e) = state.store.remove(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete processed upload");
        }
    }

    tracing::info!(
        chars = result.chars,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Humanized uploaded document"
    );

    Ok(Json(result))
}

/// Strip the `{epoch_ms}_` prefix the store adds.
fn stored_to_original_name(stored: &str) -> &str {
    match stored.split_once('_') {
        Some((stamp, rest))
            if !stamp.is_empty() && !rest.is_empty() && stamp.chars().all(|c| c.is_ascii_digit()) =>
        {
            rest
        }
        _ => stored,
    }
}
