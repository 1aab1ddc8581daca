//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use humanizer_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AI Text Humanizer API",
        version = "1.0.0",
        description = "Rewrites AI-generated text so it reads naturally. Accepts raw text or uploaded PDF, DOCX, PPTX and TXT documents. All endpoints are versioned under /api/v1/."
    ),
    paths(
        handlers::health::root,
        handlers::health::health_check,
        handlers::humanize::humanize_text,
        handlers::upload::upload_document,
        handlers::humanize_file::humanize_file,
    ),
    components(
        schemas(
            models::HumanizeRequest,
            models::HumanizeFileRequest,
            models::HumanizeParameters,
            models::HumanizeResult,
            models::SourceText,
            models::SourceMode,
            models::LengthOption,
            models::SimilarityOption,
            models::StyleOption,
            models::UploadResponse,
            handlers::health::RootResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service status"),
        (name = "humanize", description = "Text rewriting"),
        (name = "upload", description = "Document upload and text extraction")
    )
)]
pub struct ApiDoc;
