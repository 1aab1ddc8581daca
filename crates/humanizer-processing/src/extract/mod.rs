//! Text extraction for uploaded documents.
//!
//! Each supported format has its own [`TextExtractor`]. [`extractor_for`] picks one from
//! the lowercased file extension, and every parser failure is reported uniformly as
//! `Failed to parse <FORMAT>: <cause>`.

mod docx;
mod ooxml;
mod pdf;
mod pptx;
mod txt;

use std::fmt;
use std::path::Path;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use pptx::PptxExtractor;
pub use txt::TxtExtractor;

/// Document formats the service can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Pptx,
    Txt,
}

impl DocumentFormat {
    /// Map a file extension (any case, with or without the leading dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "pptx" => Some(DocumentFormat::Pptx),
            "txt" => Some(DocumentFormat::Txt),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            DocumentFormat::Txt => "text/plain",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Pptx => "PPTX",
            DocumentFormat::Txt => "TXT",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Failed to parse {format}: {message}")]
    Parse {
        format: DocumentFormat,
        message: String,
    },
}

impl ExtractionError {
    pub(crate) fn parse(format: DocumentFormat, cause: impl fmt::Display) -> Self {
        ExtractionError::Parse {
            format,
            message: cause.to_string(),
        }
    }
}

/// A format-specific text extractor.
pub trait TextExtractor: Send + Sync {
    fn format(&self) -> DocumentFormat;

    /// Extract the document's text. Surrounding whitespace is not yet trimmed.
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Select the extractor for a filename's extension.
pub fn extractor_for(filename: &str) -> Result<Box<dyn TextExtractor>, ExtractionError> {
    let format = DocumentFormat::from_filename(filename).ok_or_else(|| {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        ExtractionError::UnsupportedType(format!(".{}", extension))
    })?;

    Ok(match format {
        DocumentFormat::Pdf => Box::new(PdfExtractor),
        DocumentFormat::Docx => Box::new(DocxExtractor),
        DocumentFormat::Pptx => Box::new(PptxExtractor),
        DocumentFormat::Txt => Box::new(TxtExtractor),
    })
}

/// Extract text from a document, dispatching on its filename. The result is trimmed.
#[tracing::instrument(skip(bytes), fields(size_bytes = bytes.len()))]
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
    let extractor = extractor_for(filename)?;
    let text = extractor.extract(bytes)?;
    let text = text.trim().to_string();

    tracing::debug!(
        format = %extractor.format(),
        chars = text.chars().count(),
        "Extracted document text"
    );

    Ok(text)
}
