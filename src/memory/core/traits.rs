// src/memory/core/traits.rs

//! Core trait for memory backends (SQLite, in-memory, …).
//! All storage goes through this—no direct DB calls in business logic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::memory::core::types::ConversationMemory;

/// Persistence contract for per-user conversation-summary records.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Load up to `limit` records owned by `user_id`, ordered by
    /// `last_accessed` descending. Must never return another user's records.
    async fn fetch_candidates(
        &self,
        user_id: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<ConversationMemory>>;

    /// Insert or overwrite the record keyed by `memory.id`, returning the
    /// stored row. On overwrite, `created_at` is preserved and `importance`
    /// never decreases; `summary` and `key_topics` are replaced wholesale.
    async fn upsert(&self, memory: &ConversationMemory) -> anyhow::Result<ConversationMemory>;

    /// Stamp `last_accessed` on a record that was surfaced as context.
    async fn touch_accessed(&self, id: &str, when: DateTime<Utc>) -> anyhow::Result<()>;
}
