pub mod prompt;

use crate::llm::provider::{ChatMessage, CompletionProvider, CompletionRequest, LlmError};
use prompt::TOON_SYSTEM_PROMPT;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const INVALID_JSON_SENTINEL: &str = "ERROR: Invalid JSON input";

/// Body of `POST /convert`. A missing field reads as empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConversionRequest {
    #[serde(default)]
    pub json_input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub toon_output: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Validates input locally, then hands it to the completion provider.
///
/// Every outcome is folded into a [`ConversionResult`]; nothing here fails.
#[derive(Debug)]
pub struct Converter<P> {
    provider: Option<P>,
    settings: CompletionSettings,
}

impl<P: CompletionProvider> Converter<P> {
    /// `provider` is `None` when no credential is configured; each
    /// conversion then reports [`LlmError::MissingApiKey`].
    pub fn new(provider: Option<P>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    pub async fn convert(&self, json_input: &str) -> ConversionResult {
        if !is_valid_json(json_input) {
            info!(
                outcome = "invalid_input",
                input_len = json_input.len(),
                "conversion rejected"
            );
            return ConversionResult {
                toon_output: INVALID_JSON_SENTINEL.to_string(),
            };
        }

        match self.delegate(json_input).await {
            Ok(text) => {
                info!(
                    outcome = "converted",
                    input_len = json_input.len(),
                    output_len = text.len(),
                    "conversion finished"
                );
                ConversionResult { toon_output: text }
            }
            Err(err) => {
                warn!(
                    outcome = "upstream_error",
                    input_len = json_input.len(),
                    error = %err,
                    "conversion failed"
                );
                ConversionResult {
                    toon_output: format!("Error: {err}"),
                }
            }
        }
    }

    async fn delegate(&self, json_input: &str) -> Result<String, LlmError> {
        let provider = self.provider.as_ref().ok_or(LlmError::MissingApiKey)?;
        let output = provider.complete(self.build_request(json_input)).await?;
        Ok(output.text)
    }

    fn build_request(&self, json_input: &str) -> CompletionRequest {
        CompletionRequest {
            messages: vec![
                ChatMessage::system(TOON_SYSTEM_PROMPT),
                ChatMessage::user(json_input),
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
}
