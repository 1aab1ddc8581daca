//! API constants

/// Versioned prefix for every API route
pub const API_PREFIX: &str = "/api/v1";

/// Where the OpenAPI document is served
pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";

pub const DOCS_PATH: &str = "/docs";

pub const HEALTH_PATH: &str = "/health";

/// Extra room above the upload ceiling for multipart framing, so oversized files reach the
/// validator instead of being cut off by the transport.
pub const BODY_LIMIT_SLACK_BYTES: usize = 1024 * 1024;
