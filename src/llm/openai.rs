// src/llm/openai.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::MnemoConfig;
use crate::llm::summarizer::{Summarizer, SummarizerError};

/// Summarizer backed by the OpenAI chat completions endpoint.
pub struct OpenAiSummarizer {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl OpenAiSummarizer {
    /// Returns `None` when no API key is present, so callers can treat the
    /// summarizer as unconfigured instead of failing every request later.
    pub fn from_env(config: &MnemoConfig) -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self::new(api_key, config))
    }

    pub fn new(api_key: String, config: &MnemoConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base: config.openai_base_url.clone(),
            model: config.model.clone(),
            temperature: config.summary_temperature,
            max_tokens: config.summary_max_tokens,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    /// Map an HTTP failure status onto the error taxonomy. A 429 carrying
    /// the `insufficient_quota` error code means the account is out of
    /// budget; any other 429 is ordinary rate limiting.
    fn classify_status(status: StatusCode, body: &str) -> SummarizerError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                if body.contains("insufficient_quota") {
                    SummarizerError::QuotaExceeded(body.to_string())
                } else {
                    SummarizerError::RateLimited(body.to_string())
                }
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                SummarizerError::AuthFailed(body.to_string())
            }
            _ => SummarizerError::Other(format!("OpenAI API error {}: {}", status, body)),
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn summarize_text(&self, prompt: &str) -> Result<String, SummarizerError> {
        let payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| SummarizerError::Other(format!("Failed to send summary request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Self::classify_status(status, &error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SummarizerError::Other(format!("Failed to parse response: {}", e)))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| SummarizerError::Other("Response missing message content".to_string()))?;

        debug!("Summarizer returned {} chars", content.len());
        Ok(content.trim().to_string())
    }
}
