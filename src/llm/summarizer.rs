// src/llm/summarizer.rs
// Summarizer trait and error taxonomy for the summarization dependency

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One turn of a conversation, as supplied by the embedding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Render as a `role: content` line for prompt embedding.
    pub fn as_prompt_line(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}

/// Failure taxonomy for summarization calls.
///
/// The quota breaker branches on these variants, so the distinction between
/// exhaustion (quota/rate) and misconfiguration (auth) is load-bearing.
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("summarizer error: {0}")]
    Other(String),
}

impl SummarizerError {
    /// Whether this failure counts toward tripping the quota breaker.
    /// Auth and generic failures do not: they signal misconfiguration or
    /// transient transport problems, not usage exhaustion.
    pub fn counts_against_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_) | Self::RateLimited(_))
    }
}

/// Abstraction over the external completion call used to produce summaries
/// and topic lists. All summarization goes through this—no direct HTTP in
/// the memory service.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarizer name for logging/debugging
    fn name(&self) -> &'static str;

    /// Single free-text completion call.
    async fn summarize_text(&self, prompt: &str) -> Result<String, SummarizerError>;
}
