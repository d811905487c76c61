// src/memory/storage/sqlite/store.rs

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::memory::core::traits::MemoryStore;
use crate::memory::core::types::ConversationMemory;

pub struct SqliteMemoryStore {
    pub pool: SqlitePool,
}

impl SqliteMemoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        super::migration::run_migrations(&self.pool).await
    }

    fn row_to_memory(row: &SqliteRow) -> Result<ConversationMemory> {
        let key_topics: String = row.get("key_topics");
        let created_at: NaiveDateTime = row.get("created_at");
        let last_accessed: NaiveDateTime = row.get("last_accessed");

        Ok(ConversationMemory {
            id: row.get("id"),
            user_id: row.get("user_id"),
            conversation_id: row.get("conversation_id"),
            summary: row.get("summary"),
            key_topics: serde_json::from_str(&key_topics).unwrap_or_default(),
            importance: row.get("importance"),
            created_at: Utc.from_utc_datetime(&created_at),
            last_accessed: Utc.from_utc_datetime(&last_accessed),
        })
    }
}

#[async_trait]
impl MemoryStore for SqliteMemoryStore {
    async fn fetch_candidates(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationMemory>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, conversation_id, summary, key_topics,
                   importance, created_at, last_accessed
            FROM conversation_memories
            WHERE user_id = ?
            ORDER BY last_accessed DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_memory).collect()
    }

    /// Overwrite keeps the original `created_at` and never lowers
    /// `importance`; `summary` and `key_topics` are replaced wholesale.
    async fn upsert(&self, memory: &ConversationMemory) -> Result<ConversationMemory> {
        let key_topics_json = serde_json::to_string(&memory.key_topics)?;

        let row = sqlx::query(
            r#"
            INSERT INTO conversation_memories (
                id, user_id, conversation_id, summary, key_topics,
                importance, created_at, last_accessed
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                summary = excluded.summary,
                key_topics = excluded.key_topics,
                importance = MAX(conversation_memories.importance, excluded.importance),
                last_accessed = excluded.last_accessed
            RETURNING id, user_id, conversation_id, summary, key_topics,
                      importance, created_at, last_accessed
            "#,
        )
        .bind(&memory.id)
        .bind(&memory.user_id)
        .bind(&memory.conversation_id)
        .bind(&memory.summary)
        .bind(key_topics_json)
        .bind(memory.importance)
        .bind(memory.created_at.naive_utc())
        .bind(memory.last_accessed.naive_utc())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_memory(&row)
    }

    async fn touch_accessed(&self, id: &str, when: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE conversation_memories
            SET last_accessed = ?
            WHERE id = ?
            "#,
        )
        .bind(when.naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
