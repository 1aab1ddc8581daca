/// What gets forwarded to the rewriting backend for a single request.
///
/// Built once at the HTTP boundary: extracted text when there is any, otherwise the
/// original document bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferMode {
    Text(String),
    File { filename: String, bytes: Vec<u8> },
}

impl TransferMode {
    /// Text mode when `text` has any non-whitespace content, file mode otherwise.
    pub fn select(text: String, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        if text.trim().is_empty() {
            TransferMode::File {
                filename: filename.into(),
                bytes,
            }
        } else {
            TransferMode::Text(text)
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, TransferMode::File { .. })
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TransferMode::Text(_) => "text",
            TransferMode::File { .. } => "file",
        }
    }
}
