//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Crate errors (validation,
//! extraction, storage, upstream) convert into `AppError` here, so every failure renders
//! with the same status mapping, body shape and logging.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use humanizer_core::{AppError, ErrorMetadata, LogLevel};
use humanizer_processing::{ExtractionError, ValidationError};
use humanizer_services::HumanizeError;
use humanizer_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse.
/// Needed because of the orphan rule: AppError lives in humanizer-core.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// The full error body, diagnostics included, attached to error responses as an
/// extension. Only [`expose_error_details`] puts it on the wire.
#[derive(Debug, Clone)]
struct DetailedErrorBody(ErrorResponse);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse {
            error: app_error.client_message(),
            details: None,
            error_type: None,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };
        let detailed = (!app_error.is_sensitive()).then(|| {
            DetailedErrorBody(ErrorResponse {
                details: Some(app_error.detailed_message()),
                error_type: Some(app_error.error_type().to_string()),
                ..body.clone()
            })
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(detailed) = detailed {
            response.extensions_mut().insert(detailed);
        }
        response
    }
}

/// Middleware for non-production deployments: re-renders error responses with their
/// `details` and `error_type` fields filled in.
pub async fn expose_error_details(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    match response.extensions_mut().remove::<DetailedErrorBody>() {
        Some(DetailedErrorBody(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(path) => AppError::NotFound(format!("File not found: {}", path)),
            StorageError::InvalidPath(msg) => AppError::InvalidInput(msg),
            StorageError::UploadFailed(msg) => AppError::Processing(msg),
            StorageError::ReadFailed(msg) => AppError::Processing(msg),
            StorageError::DeleteFailed(msg) => AppError::Processing(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { size, max } => AppError::InvalidInput(format!(
                "File too large: {} bytes exceeds the {} MB limit",
                size,
                max / 1024 / 1024
            )),
            ValidationError::InvalidExtension { extension, allowed } => {
                AppError::InvalidInput(format!(
                    "Unsupported file type '.{}'. Allowed types: {}",
                    extension,
                    allowed.join(", ")
                ))
            }
            ValidationError::MissingExtension(filename) => {
                AppError::InvalidInput(format!("Missing file extension (filename: {})", filename))
            }
            ValidationError::InvalidFilename(msg) => {
                AppError::InvalidInput(format!("Invalid filename: {}", msg))
            }
        };
        HttpAppError(app)
    }
}

/// Parse failures are the client's document, not our fault: 400.
impl From<ExtractionError> for HttpAppError {
    fn from(err: ExtractionError) -> Self {
        HttpAppError(AppError::InvalidInput(err.to_string()))
    }
}

impl From<HumanizeError> for HttpAppError {
    fn from(err: HumanizeError) -> Self {
        let app = match err {
            HumanizeError::Timeout(msg) => AppError::UpstreamTimeout(msg),
            other => AppError::Upstream(other.to_string()),
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let HttpAppError(app_err) = StorageError::NotFound("uploads/1_a.txt".to_string()).into();
        assert_eq!(app_err.http_status_code(), 404);
        assert!(app_err.client_message().contains("uploads/1_a.txt"));
    }

    #[test]
    fn test_from_storage_error_invalid_path() {
        let HttpAppError(app_err) = StorageError::InvalidPath("outside".to_string()).into();
        match app_err {
            AppError::InvalidInput(msg) => assert_eq!(msg, "outside"),
            _ => panic!("Expected InvalidInput variant"),
        }
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        assert_eq!(app_err.http_status_code(), 500);
        assert!(app_err.is_sensitive());
    }

    #[test]
    fn test_from_validation_error_file_too_large_is_bad_request() {
        let HttpAppError(app_err) = ValidationError::FileTooLarge {
            size: 50 * 1024 * 1024,
            max: 40 * 1024 * 1024,
        }
        .into();
        assert_eq!(app_err.http_status_code(), 400);
        assert!(app_err.client_message().contains("40 MB"));
    }

    #[test]
    fn test_from_validation_error_invalid_extension() {
        let HttpAppError(app_err) = ValidationError::InvalidExtension {
            extension: "exe".to_string(),
            allowed: vec!["pdf".to_string(), "txt".to_string()],
        }
        .into();
        match app_err {
            AppError::InvalidInput(msg) => {
                assert!(msg.contains(".exe"));
                assert!(msg.contains("pdf, txt"));
            }
            _ => panic!("Expected InvalidInput variant"),
        }
    }

    #[test]
    fn test_from_extraction_error_is_bad_request() {
        let HttpAppError(app_err) =
            ExtractionError::UnsupportedType(".rtf".to_string()).into();
        assert_eq!(app_err.http_status_code(), 400);
    }

    #[test]
    fn test_from_humanize_error() {
        let HttpAppError(app_err) = HumanizeError::Timeout("120s".to_string()).into();
        assert!(matches!(app_err, AppError::UpstreamTimeout(_)));
        assert_eq!(app_err.http_status_code(), 500);

        let HttpAppError(app_err) = HumanizeError::Status {
            status: 401,
            body: "invalid api key".to_string(),
        }
        .into();
        assert!(matches!(app_err, AppError::Upstream(_)));
        assert!(app_err.client_message().contains("invalid api key"));
    }

    #[test]
    fn test_error_details_kept_off_the_wire() {
        let response = HttpAppError(AppError::NotFound("uploads/1_a.txt".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let detailed = response.extensions().get::<DetailedErrorBody>().unwrap();
        assert_eq!(detailed.0.error_type.as_deref(), Some("NotFound"));

        let response = HttpAppError(AppError::Internal("disk".to_string())).into_response();
        assert!(response.extensions().get::<DetailedErrorBody>().is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "File not found".to_string(),
            details: None,
            error_type: None,
            code: "NOT_FOUND".to_string(),
            recoverable: false,
            suggested_action: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["recoverable"], false);
        assert!(json.get("details").is_none());
        assert!(json.get("suggested_action").is_none());
    }
}
