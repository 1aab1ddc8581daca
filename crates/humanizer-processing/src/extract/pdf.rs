use std::panic::{catch_unwind, AssertUnwindSafe};

use super::{DocumentFormat, ExtractionError, TextExtractor};

/// Extracts the text layer of a PDF, page by page.
///
/// Each page is right-trimmed and blank pages are skipped. Scanned documents without a
/// text layer yield an empty string.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed inputs instead of returning an error.
        let pages = catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }))
        .map_err(|_| ExtractionError::parse(DocumentFormat::Pdf, "malformed document"))?
        .map_err(|e| ExtractionError::parse(DocumentFormat::Pdf, e))?;

        Ok(join_pages(pages))
    }
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .iter()
        .map(|page| page.trim_end())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
