// src/memory/storage/memory.rs
// In-memory MemoryStore for tests and database-less deployments

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::memory::core::traits::MemoryStore;
use crate::memory::core::types::ConversationMemory;

/// HashMap-backed store with the same overwrite semantics as the SQLite
/// backend: `created_at` preserved, `importance` never lowered.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, ConversationMemory>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<ConversationMemory> {
        self.records.read().await.get(id).cloned()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn fetch_candidates(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationMemory>> {
        let records = self.records.read().await;
        let mut candidates: Vec<ConversationMemory> = records
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();

        candidates.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        candidates.truncate(limit);
        Ok(candidates)
    }

    async fn upsert(&self, memory: &ConversationMemory) -> Result<ConversationMemory> {
        let mut records = self.records.write().await;

        let stored = match records.get(&memory.id) {
            Some(existing) => {
                let mut updated = memory.clone();
                updated.created_at = existing.created_at;
                updated.importance = existing.importance.max(memory.importance);
                updated
            }
            None => memory.clone(),
        };

        records.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn touch_accessed(&self, id: &str, when: DateTime<Utc>) -> Result<()> {
        let mut records = self.records.write().await;
        if let Some(memory) = records.get_mut(id) {
            memory.last_accessed = when;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn memory(user: &str, conv: &str, importance: f32, at: DateTime<Utc>) -> ConversationMemory {
        ConversationMemory {
            id: ConversationMemory::summary_id(conv),
            user_id: user.into(),
            conversation_id: conv.into(),
            summary: format!("Summary of {}", conv),
            key_topics: vec!["topic".into()],
            importance,
            created_at: at,
            last_accessed: at,
        }
    }

    #[tokio::test]
    async fn test_fetch_is_user_scoped() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.upsert(&memory("u1", "c1", 0.5, now)).await.unwrap();
        store.upsert(&memory("u2", "c2", 0.5, now)).await.unwrap();

        let fetched = store.fetch_candidates("u1", 10).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].user_id, "u1");
    }

    #[tokio::test]
    async fn test_fetch_orders_by_last_accessed_desc() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.upsert(&memory("u1", "old", 0.5, now - Duration::hours(2))).await.unwrap();
        store.upsert(&memory("u1", "new", 0.5, now)).await.unwrap();

        let fetched = store.fetch_candidates("u1", 10).await.unwrap();
        assert_eq!(fetched[0].conversation_id, "new");
        assert_eq!(fetched[1].conversation_id, "old");
    }

    #[tokio::test]
    async fn test_upsert_preserves_created_at_and_floors_importance() {
        let store = InMemoryStore::new();
        let first_at = Utc::now() - Duration::days(1);
        let original = memory("u1", "c1", 0.8, first_at);
        store.upsert(&original).await.unwrap();

        let rewrite = memory("u1", "c1", 0.3, Utc::now());
        let stored = store.upsert(&rewrite).await.unwrap();

        assert_eq!(stored.created_at, first_at);
        assert_eq!(stored.importance, 0.8);
        assert_eq!(stored.summary, rewrite.summary);
    }

    #[tokio::test]
    async fn test_touch_updates_last_accessed() {
        let store = InMemoryStore::new();
        let past = Utc::now() - Duration::hours(3);
        store.upsert(&memory("u1", "c1", 0.5, past)).await.unwrap();

        let now = Utc::now();
        store.touch_accessed("c1_summary", now).await.unwrap();

        let stored = store.get("c1_summary").await.unwrap();
        assert_eq!(stored.last_accessed, now);
    }
}
