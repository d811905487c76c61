// src/memory/core/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many messages saturate the importance weight at 1.0.
pub const IMPORTANCE_SATURATION_MESSAGES: usize = 10;

/// Durable record summarizing one conversation (or conversation-so-far)
/// for a user. Retrieval is always scoped to the owning `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemory {
    /// Stable key: `<conversation_id>_summary`, so re-summarizing the same
    /// conversation overwrites rather than duplicates.
    pub id: String,
    pub user_id: String,
    pub conversation_id: String,

    /// Short natural-language summary (2-3 sentences).
    pub summary: String,

    /// Topic strings used only for relevance scoring. Not guaranteed unique.
    pub key_topics: Vec<String>,

    /// Weight in [0, 1], non-decreasing with the number of messages
    /// summarized. Multiplies into relevance scores.
    pub importance: f32,

    /// Set once at first creation; preserved across re-summarization.
    pub created_at: DateTime<Utc>,

    /// Refreshed whenever the record is surfaced as a relevant memory.
    /// Drives recency ordering of candidate retrieval.
    pub last_accessed: DateTime<Utc>,
}

impl ConversationMemory {
    pub fn summary_id(conversation_id: &str) -> String {
        format!("{}_summary", conversation_id)
    }

    /// Importance grows with conversation length and saturates at 1.0
    /// once the conversation has at least ten messages.
    pub fn importance_for(message_count: usize) -> f32 {
        (message_count as f32 / IMPORTANCE_SATURATION_MESSAGES as f32).min(1.0)
    }

    pub fn new(
        user_id: String,
        conversation_id: String,
        summary: String,
        key_topics: Vec<String>,
        message_count: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::summary_id(&conversation_id),
            user_id,
            conversation_id,
            summary,
            key_topics,
            importance: Self::importance_for(message_count),
            created_at: now,
            last_accessed: now,
        }
    }
}

/// Per-request context bundle handed to the prompt-construction layer.
/// Built fresh on every call and never persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryContext {
    /// The input transcript restated as `role: content` lines, most recent last.
    pub recent_messages: Vec<String>,

    /// Rolling summary of the current conversation, or empty if not
    /// computed this turn.
    pub conversation_summary: String,

    /// Summaries pulled from other stored records, highest relevance first.
    pub relevant_memories: Vec<String>,

    /// `relevant_memories` rendered as newline-joined
    /// `Previous conversation: <summary>` lines.
    pub user_context: String,
}

impl MemoryContext {
    /// Render the user-context block from a set of retrieved memories.
    pub fn render_user_context(memories: &[ConversationMemory]) -> String {
        memories
            .iter()
            .map(|m| format!("Previous conversation: {}", m.summary))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
