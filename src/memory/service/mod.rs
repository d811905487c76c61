// src/memory/service/mod.rs

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::MnemoConfig;
use crate::llm::summarizer::{ChatMessage, Summarizer, SummarizerError};
use crate::memory::core::clock::{Clock, SystemClock};
use crate::memory::core::error::MemoryError;
use crate::memory::core::traits::MemoryStore;
use crate::memory::core::types::{ConversationMemory, MemoryContext};
use crate::memory::features::fallback::fallback_summarize;
use crate::memory::features::quota::QuotaBreaker;
use crate::memory::features::relevance::rank_memories;
use crate::memory::features::triggers::SummaryTriggers;

/// Produces the per-turn `MemoryContext` and persists conversation
/// summaries. All collaborators are injected; there is no global instance.
pub struct MemoryService {
    store: Arc<dyn MemoryStore>,
    summarizer: Option<Arc<dyn Summarizer>>,
    breaker: Arc<QuotaBreaker>,
    clock: Arc<dyn Clock>,
    triggers: SummaryTriggers,
    candidate_limit: usize,
    relevant_limit: usize,
}

impl MemoryService {
    pub fn new(
        store: Arc<dyn MemoryStore>,
        summarizer: Option<Arc<dyn Summarizer>>,
        breaker: Arc<QuotaBreaker>,
        clock: Arc<dyn Clock>,
        config: &MnemoConfig,
    ) -> Self {
        Self {
            store,
            summarizer,
            breaker,
            clock,
            triggers: SummaryTriggers::from_config(config),
            candidate_limit: config.candidate_limit,
            relevant_limit: config.relevant_limit,
        }
    }

    /// Convenience constructor wiring the wall clock and a breaker sized
    /// from config.
    pub fn with_system_clock(
        store: Arc<dyn MemoryStore>,
        summarizer: Option<Arc<dyn Summarizer>>,
        config: &MnemoConfig,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let breaker = Arc::new(QuotaBreaker::new(
            clock.clone(),
            config.quota_trip_threshold,
            config.quota_cooldown_secs,
        ));
        Self::new(store, summarizer, breaker, clock, config)
    }

    pub fn triggers(&self) -> SummaryTriggers {
        self.triggers
    }

    pub fn summarizer_configured(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Build the memory context for one user turn.
    ///
    /// Every dependency failure inside this call degrades to empty or
    /// partial fields; the only error is an empty `user_id`, which is a
    /// caller contract violation rather than a runtime condition.
    pub async fn build_context(
        &self,
        user_id: &str,
        current_message: &str,
        recent_messages: &[ChatMessage],
    ) -> Result<MemoryContext, MemoryError> {
        if user_id.trim().is_empty() {
            return Err(MemoryError::InvalidInput(
                "user_id must not be empty".to_string(),
            ));
        }

        let relevant = self.relevant_memories(user_id, current_message).await;

        let conversation_summary = if self.triggers.should_attempt_rolling(recent_messages.len()) {
            self.rolling_snapshot(recent_messages).await
        } else {
            String::new()
        };

        info!(
            "Built context for {}: {} relevant memories, summary {}",
            user_id,
            relevant.len(),
            if conversation_summary.is_empty() {
                "absent"
            } else {
                "present"
            }
        );

        let user_context = MemoryContext::render_user_context(&relevant);

        Ok(MemoryContext {
            recent_messages: recent_messages.iter().map(|m| m.as_prompt_line()).collect(),
            conversation_summary,
            relevant_memories: relevant.into_iter().map(|m| m.summary).collect(),
            user_context,
        })
    }

    /// Summarize a conversation and persist it as a `ConversationMemory`.
    ///
    /// Summarizer trouble of any kind degrades to the offline fallback
    /// generator; the record is always written. Only the persistence write
    /// itself can fail the call.
    pub async fn create_summary(
        &self,
        user_id: &str,
        conversation_id: &str,
        messages: &[ChatMessage],
    ) -> Result<ConversationMemory, MemoryError> {
        if user_id.trim().is_empty() {
            return Err(MemoryError::InvalidInput(
                "user_id must not be empty".to_string(),
            ));
        }
        if conversation_id.trim().is_empty() {
            return Err(MemoryError::InvalidInput(
                "conversation_id must not be empty".to_string(),
            ));
        }

        let (summary, key_topics) = self.generate_summary(messages).await;

        let record = ConversationMemory::new(
            user_id.to_string(),
            conversation_id.to_string(),
            summary,
            key_topics,
            messages.len(),
            self.clock.now(),
        );

        let stored = self
            .store
            .upsert(&record)
            .await
            .map_err(|e| MemoryError::Persistence(format!("{e:#}")))?;

        info!(
            "Stored summary {} ({} topics, importance {:.2})",
            stored.id,
            stored.key_topics.len(),
            stored.importance
        );

        Ok(stored)
    }

    /// Fetch, score, and rank this user's stored memories against the
    /// current message, stamping `last_accessed` on the winners. Read
    /// failures degrade to an empty list.
    async fn relevant_memories(&self, user_id: &str, query: &str) -> Vec<ConversationMemory> {
        let candidates = match self
            .store
            .fetch_candidates(user_id, self.candidate_limit)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Failed to fetch memory candidates for {}: {e:#}", user_id);
                return Vec::new();
            }
        };

        if candidates.is_empty() {
            return Vec::new();
        }

        let kept = rank_memories(query, candidates, self.relevant_limit);

        // Partial touch failures must not abort the build: log and continue.
        let now = self.clock.now();
        let results = join_all(kept.iter().map(|m| self.store.touch_accessed(&m.id, now))).await;
        for (memory, result) in kept.iter().zip(results) {
            if let Err(e) = result {
                warn!("Failed to touch last_accessed for {}: {e:#}", memory.id);
            }
        }

        kept
    }

    /// Best-effort rolling summary of the conversation-so-far, under a
    /// synthesized temporary identity. Not persisted; on any summarizer
    /// failure the turn proceeds without a summary.
    async fn rolling_snapshot(&self, messages: &[ChatMessage]) -> String {
        let Some(summarizer) = &self.summarizer else {
            return String::new();
        };
        if !self.breaker.is_allowed() {
            debug!("Quota breaker open, skipping rolling snapshot");
            return String::new();
        }

        let snapshot_id = format!("temp_{}", Uuid::new_v4());
        match summarizer.summarize_text(&build_summary_prompt(messages)).await {
            Ok(summary) => {
                self.breaker.record_success();
                summary
            }
            Err(err) => {
                self.breaker.record_failure(&err);
                warn!("Rolling snapshot {} failed, continuing without summary: {}", snapshot_id, err);
                String::new()
            }
        }
    }

    /// Produce summary text and topics, via the LLM when it is configured
    /// and allowed, otherwise via the deterministic fallback.
    async fn generate_summary(&self, messages: &[ChatMessage]) -> (String, Vec<String>) {
        if let Some(summarizer) = &self.summarizer {
            if self.breaker.is_allowed() {
                match self.llm_summary(summarizer.as_ref(), messages).await {
                    Ok(pair) => {
                        self.breaker.record_success();
                        return pair;
                    }
                    Err(err) => {
                        self.breaker.record_failure(&err);
                        match &err {
                            SummarizerError::AuthFailed(_) => {
                                warn!("Summarizer auth failed (check API key), using offline fallback: {}", err)
                            }
                            _ => warn!("Summarization failed, using offline fallback: {}", err),
                        }
                    }
                }
            } else {
                debug!("Quota breaker open, using offline fallback");
            }
        }

        let fallback = fallback_summarize(messages);
        (fallback.summary, fallback.key_topics)
    }

    /// Two completion calls: one for the summary text, one for the
    /// comma-separated topic list parsed out of it.
    async fn llm_summary(
        &self,
        summarizer: &dyn Summarizer,
        messages: &[ChatMessage],
    ) -> Result<(String, Vec<String>), SummarizerError> {
        let summary = summarizer
            .summarize_text(&build_summary_prompt(messages))
            .await?;

        let topics_raw = summarizer
            .summarize_text(&build_topics_prompt(&summary))
            .await?;
        let key_topics = topics_raw
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok((summary, key_topics))
    }
}

fn build_summary_prompt(messages: &[ChatMessage]) -> String {
    let transcript = messages
        .iter()
        .map(|m| m.as_prompt_line())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Summarize the following conversation in 2-3 sentences. \
         Extract key topics and important information that would be useful for future context.\n\n\
         Conversation:\n{}\n\nSummary:",
        transcript
    )
}

fn build_topics_prompt(summary: &str) -> String {
    format!(
        "Extract 3-5 key topics from this conversation summary:\n{}\n\nTopics (comma-separated):",
        summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_includes_transcript() {
        let messages = vec![
            ChatMessage::new("user", "hello"),
            ChatMessage::new("assistant", "hi there"),
        ];
        let prompt = build_summary_prompt(&messages);
        assert!(prompt.contains("user: hello"));
        assert!(prompt.contains("assistant: hi there"));
        assert!(prompt.ends_with("Summary:"));
    }

    #[test]
    fn test_topics_prompt_embeds_summary() {
        let prompt = build_topics_prompt("Talked about travel.");
        assert!(prompt.contains("Talked about travel."));
        assert!(prompt.contains("comma-separated"));
    }
}
