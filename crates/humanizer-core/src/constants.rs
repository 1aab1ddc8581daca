//! Limits shared between the HTTP layer and the processing pipeline.

/// Maximum accepted upload size (40 MiB).
pub const MAX_UPLOAD_SIZE_BYTES: usize = 40 * 1024 * 1024;

/// Extensions accepted by the upload endpoint, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "pptx", "txt"];

/// Bounds on source text length (in characters) for text-mode requests.
pub const MIN_TEXT_CHARS: usize = 300;
pub const MAX_TEXT_CHARS: usize = 5000;

/// Maximum length of a custom style description.
pub const MAX_CUSTOM_STYLE_CHARS: usize = 120;

/// Total context window assumed for the upstream model.
pub const DEFAULT_CONTEXT_WINDOW: usize = 128_000;
/// Tokens reserved for the model's answer.
pub const OUTPUT_TOKEN_RESERVE: usize = 4_000;
/// Tokens reserved for instructions wrapped around the source text.
pub const PROMPT_OVERHEAD_RESERVE: usize = 1_000;
