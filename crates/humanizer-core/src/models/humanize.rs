use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{MAX_CUSTOM_STYLE_CHARS, MAX_TEXT_CHARS, MIN_TEXT_CHARS};
use crate::error::AppError;

/// Target length of the rewritten text relative to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LengthOption {
    Normal,
    Concise,
    Expanded,
}

/// How far the rewrite may drift from the original phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SimilarityOption {
    Low,
    Moderate,
    High,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum StyleOption {
    Neutral,
    Academic,
    Business,
    Creative,
    Technical,
    Friendly,
    Informal,
    Reference,
    Custom,
}

/// Where the source text came from. Length bounds only apply to `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Text,
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeParameters {
    pub length: LengthOption,
    pub similarity: SimilarityOption,
    pub style: StyleOption,
    /// Free-text style description, required when `style` is `Custom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_style: Option<String>,
}

impl HumanizeParameters {
    pub fn new(length: LengthOption, similarity: SimilarityOption, style: StyleOption) -> Self {
        Self {
            length,
            similarity,
            style,
            custom_style: None,
        }
    }

    pub fn with_custom_style(mut self, custom_style: impl Into<String>) -> Self {
        self.custom_style = Some(custom_style.into());
        self
    }

    /// The custom style text, only meaningful when `style` is `Custom`.
    pub fn custom_style(&self) -> Option<&str> {
        match self.style {
            StyleOption::Custom => self.custom_style.as_deref(),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(custom) = &self.custom_style {
            if custom.chars().count() > MAX_CUSTOM_STYLE_CHARS {
                return Err(AppError::InvalidInput(format!(
                    "customStyle must be at most {} characters",
                    MAX_CUSTOM_STYLE_CHARS
                )));
            }
        }

        if self.style == StyleOption::Custom {
            let present = self
                .custom_style
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty());
            if !present {
                return Err(AppError::InvalidInput(
                    "customStyle is required when style is Custom".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SourceText {
    pub mode: SourceMode,
    pub text: String,
}

/// Body of `POST /api/v1/humanize`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HumanizeRequest {
    pub source: SourceText,
    pub params: HumanizeParameters,
}

impl HumanizeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.source.mode == SourceMode::Text {
            let len = self.source.text.chars().count();
            if !(MIN_TEXT_CHARS..=MAX_TEXT_CHARS).contains(&len) {
                return Err(AppError::InvalidInput(format!(
                    "Text must be between {} and {} characters, got {}",
                    MIN_TEXT_CHARS, MAX_TEXT_CHARS, len
                )));
            }
        }
        self.params.validate()
    }
}

/// Body of `POST /api/v1/humanize-file`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HumanizeFileRequest {
    /// Path returned by the upload endpoint
    pub file_path: String,
    /// Extracted text; leave empty to send the original file instead
    #[serde(default)]
    pub text: String,
    pub params: HumanizeParameters,
}

/// Rewritten text returned by every humanize backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeResult {
    pub content: String,
    /// UTF-8 byte length of `content`
    pub chars: usize,
    /// Wall-clock processing time in milliseconds
    #[serde(rename = "processingTime")]
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_tokens: Option<usize>,
}

impl HumanizeResult {
    pub fn new(content: String, processing_time_ms: u64) -> Self {
        Self {
            chars: content.len(),
            content,
            processing_time_ms,
            truncated: None,
            original_tokens: None,
        }
    }

    pub fn with_truncation(mut self, original_tokens: usize) -> Self {
        self.truncated = Some(true);
        self.original_tokens = Some(original_tokens);
        self
    }
}
