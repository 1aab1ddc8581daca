use super::{DocumentFormat, ExtractionError, TextExtractor};

/// Plain text: UTF-8, falling back to Latin-1 for legacy single-byte files.
pub struct TxtExtractor;

impl TextExtractor for TxtExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Txt
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
            Err(e) => {
                tracing::debug!(error = %e, "Text file is not UTF-8, decoding as Latin-1");
                bytes.iter().map(|&b| char::from(b)).collect()
            }
        };
        Ok(text)
    }
}
