//! OpenAI chat completions backend.
//!
//! Text mode sends a system instruction plus the assembled prompt. File mode attaches
//! the original document as a base64 data URL, followed by a short assistant
//! acknowledgement and the prompt. One request per call, no retries.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use humanizer_core::{HumanizeParameters, HumanizeResult, TransferMode};
use humanizer_processing::{DocumentFormat, TokenBudgeter};
use serde::{Deserialize, Serialize};

use crate::humanizer::{HumanizeError, Humanizer};
use crate::prompt::{build_file_prompt, build_prompt};

const SYSTEM_PROMPT: &str = "You are a professional text rewriting assistant that makes AI-generated text sound more natural and human-like.";
const MAX_OUTPUT_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// Full chat completions URL
    pub api_url: String,
    pub timeout: Duration,
    pub context_window: usize,
}

impl Debug for OpenAiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiConfig")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("context_window", &self.context_window)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

impl ChatMessage {
    fn text(role: &'static str, text: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(text.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    File { file: FileAttachment },
}

#[derive(Debug, Serialize)]
struct FileAttachment {
    filename: String,
    file_data: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// MIME type sent with a file attachment.
pub fn mime_type_for(filename: &str) -> &'static str {
    DocumentFormat::from_filename(filename)
        .map(|format| format.mime_type())
        .unwrap_or("application/octet-stream")
}

/// File mode only runs when no text could be extracted, so there is nothing to echo back.
fn acknowledgement(filename: &str) -> String {
    format!("I understand. I have received the document {}.", filename)
}

fn truncation_notice(original_tokens: usize, max_tokens: usize) -> String {
    format!(
        "\n\n[Note: the input was {} tokens long and was truncated to {} tokens before processing.]",
        original_tokens, max_tokens
    )
}

fn map_send_error(err: reqwest::Error) -> HumanizeError {
    if err.is_timeout() {
        HumanizeError::Timeout(err.to_string())
    } else if err.is_connect() {
        HumanizeError::Connection(err.to_string())
    } else {
        HumanizeError::Request(err.to_string())
    }
}

pub struct OpenAiHumanizer {
    http_client: reqwest::Client,
    config: OpenAiConfig,
    budgeter: TokenBudgeter,
}

impl Debug for OpenAiHumanizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiHumanizer")
            .field("config", &self.config)
            .field("budgeter", &self.budgeter)
            .finish()
    }
}

impl OpenAiHumanizer {
    pub fn new(config: OpenAiConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client for OpenAI")?;

        let budgeter = TokenBudgeter::for_model(&config.model, config.context_window);

        Ok(Self {
            http_client,
            config,
            budgeter,
        })
    }

    fn text_request(&self, prompt: String) -> ChatCompletionRequest<'_> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage::text("system", SYSTEM_PROMPT),
                ChatMessage::text("user", prompt),
            ],
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_OUTPUT_TOKENS),
            max_completion_tokens: None,
            response_format: None,
        }
    }

    fn file_request(
        &self,
        filename: &str,
        bytes: &[u8],
        prompt: String,
    ) -> ChatCompletionRequest<'_> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let file_data = format!("data:{};base64,{}", mime_type_for(filename), encoded);

        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![ContentPart::File {
                        file: FileAttachment {
                            filename: filename.to_string(),
                            file_data,
                        },
                    }]),
                },
                ChatMessage::text("assistant", acknowledgement(filename)),
                ChatMessage::text("user", prompt),
            ],
            temperature: None,
            max_tokens: None,
            max_completion_tokens: Some(MAX_OUTPUT_TOKENS),
            response_format: Some(ResponseFormat { kind: "text" }),
        }
    }

    async fn send(&self, body: &ChatCompletionRequest<'_>) -> Result<String, HumanizeError> {
        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HumanizeError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.text().await.map_err(map_send_error)?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| HumanizeError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| HumanizeError::NoResponse("response contained no choices".to_string()))
    }
}

#[async_trait]
impl Humanizer for OpenAiHumanizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[tracing::instrument(skip(self, mode, params), fields(model = %self.config.model, mode = mode.kind()))]
    async fn humanize(
        &self,
        mode: TransferMode,
        params: &HumanizeParameters,
    ) -> Result<HumanizeResult, HumanizeError> {
        let start = Instant::now();

        let (content, truncation) = match mode {
            TransferMode::Text(text) => {
                let fitted = self.budgeter.fit(&text);
                if fitted.was_truncated {
                    tracing::warn!(
                        original_tokens = fitted.original_tokens,
                        max_tokens = self.budgeter.max_input_tokens(),
                        method = %fitted.method,
                        "Input exceeds token budget, truncating"
                    );
                }
                let body = self.text_request(build_prompt(&fitted.text, params));
                let content = self.send(&body).await?;
                (content, fitted.was_truncated.then_some(fitted.original_tokens))
            }
            TransferMode::File { filename, bytes } => {
                tracing::debug!(filename = %filename, size_bytes = bytes.len(), "Sending document as attachment");
                let body = self.file_request(&filename, &bytes, build_file_prompt(&filename, params));
                (self.send(&body).await?, None)
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let result = match truncation {
            Some(original_tokens) => {
                let mut content = content;
                content.push_str(&truncation_notice(
                    original_tokens,
                    self.budgeter.max_input_tokens(),
                ));
                HumanizeResult::new(content, elapsed_ms).with_truncation(original_tokens)
            }
            None => HumanizeResult::new(content, elapsed_ms),
        };

        tracing::info!(
            chars = result.chars,
            processing_time_ms = result.processing_time_ms,
            truncated = result.truncated.unwrap_or(false),
            "Humanize request completed"
        );

        Ok(result)
    }
}
