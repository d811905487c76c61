// src/memory/storage/sqlite/migration.rs
//! Ensures the conversation_memories table matches the latest schema.
//! Run this at startup to guarantee schema compatibility.

use anyhow::Result;
use sqlx::{Executor, SqlitePool};

/// Latest schema for conversation_memories. Add columns here as the record
/// type evolves.
const CREATE_CONVERSATION_MEMORIES: &str = r#"
CREATE TABLE IF NOT EXISTS conversation_memories (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    conversation_id TEXT NOT NULL,
    summary TEXT NOT NULL,
    key_topics TEXT NOT NULL,
    importance REAL NOT NULL,
    created_at DATETIME NOT NULL,
    last_accessed DATETIME NOT NULL
);
"#;

/// Index serving the fetch_candidates query shape.
const CREATE_MEMORY_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_conversation_memories_user_accessed
    ON conversation_memories(user_id, last_accessed DESC);
"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    pool.execute(CREATE_CONVERSATION_MEMORIES).await?;
    pool.execute(CREATE_MEMORY_INDICES).await?;
    Ok(())
}
