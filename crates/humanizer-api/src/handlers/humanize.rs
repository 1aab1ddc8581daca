use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use humanizer_core::{HumanizeRequest, HumanizeResult, TransferMode};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/humanize",
    tag = "humanize",
    request_body = HumanizeRequest,
    responses(
        (status = 200, description = "Rewritten text", body = HumanizeResult),
        (status = 400, description = "Invalid parameters or text length", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(mode = ?request.source.mode, style = ?request.params.style))]
pub async fn humanize_text(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<HumanizeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let HumanizeRequest { source, params } = request;
    let result = state
        .humanizer
        .humanize(TransferMode::Text(source.text), &params)
        .await?;

    Ok(Json(result))
}
