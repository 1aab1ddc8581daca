//! Document intake pipeline: upload validation, per-format text extraction and
//! token budgeting for the upstream model.

pub mod extract;
pub mod tokens;
pub mod validator;

pub use extract::{extract_text, extractor_for, DocumentFormat, ExtractionError, TextExtractor};
pub use tokens::{TokenBudgeter, Truncation, TruncationMethod};
pub use validator::{UploadValidator, ValidationError};
