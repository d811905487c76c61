// tests/sqlite_store_test.rs
// Store behavior against an in-memory SQLite database.

use chrono::{TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;

use mnemo::memory::{ConversationMemory, MemoryStore, SqliteMemoryStore};

/// Helper to set up a clean, isolated test environment.
async fn setup_store() -> SqliteMemoryStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool.");

    let store = SqliteMemoryStore::new(pool);
    store.run_migrations().await.unwrap();
    store
}

fn memory_at(
    user: &str,
    conv: &str,
    importance: f32,
    secs: i64,
) -> ConversationMemory {
    // Whole-second timestamps sidestep sub-second storage precision.
    let at = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
    ConversationMemory {
        id: ConversationMemory::summary_id(conv),
        user_id: user.into(),
        conversation_id: conv.into(),
        summary: format!("Summary of {}", conv),
        key_topics: vec!["alpha".into(), "beta".into()],
        importance,
        created_at: at,
        last_accessed: at,
    }
}

#[tokio::test]
async fn test_upsert_and_fetch_roundtrip() {
    // ARRANGE
    let store = setup_store().await;
    let memory = memory_at("u1", "c1", 0.5, 0);

    // ACT
    store.upsert(&memory).await.unwrap();
    let fetched = store.fetch_candidates("u1", 10).await.unwrap();

    // ASSERT
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, "c1_summary");
    assert_eq!(fetched[0].summary, "Summary of c1");
    assert_eq!(fetched[0].key_topics, vec!["alpha", "beta"]);
    assert_eq!(fetched[0].importance, 0.5);
    assert_eq!(fetched[0].created_at, memory.created_at);
}

#[tokio::test]
async fn test_fetch_never_returns_other_users_records() {
    let store = setup_store().await;
    store.upsert(&memory_at("u1", "c1", 0.5, 0)).await.unwrap();
    store.upsert(&memory_at("u2", "c2", 0.5, 0)).await.unwrap();

    let fetched = store.fetch_candidates("u1", 10).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert!(fetched.iter().all(|m| m.user_id == "u1"));
}

#[tokio::test]
async fn test_fetch_orders_by_last_accessed_and_respects_limit() {
    let store = setup_store().await;
    store.upsert(&memory_at("u1", "oldest", 0.5, 0)).await.unwrap();
    store.upsert(&memory_at("u1", "middle", 0.5, 100)).await.unwrap();
    store.upsert(&memory_at("u1", "newest", 0.5, 200)).await.unwrap();

    let fetched = store.fetch_candidates("u1", 2).await.unwrap();
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].conversation_id, "newest");
    assert_eq!(fetched[1].conversation_id, "middle");
}

#[tokio::test]
async fn test_overwrite_replaces_content_and_preserves_created_at() {
    let store = setup_store().await;
    let original = memory_at("u1", "c1", 0.8, 0);
    store.upsert(&original).await.unwrap();

    let mut rewrite = memory_at("u1", "c1", 0.3, 500);
    rewrite.summary = "Rewritten summary".into();
    rewrite.key_topics = vec!["gamma".into()];
    let stored = store.upsert(&rewrite).await.unwrap();

    // Content replaced wholesale.
    assert_eq!(stored.summary, "Rewritten summary");
    assert_eq!(stored.key_topics, vec!["gamma"]);
    // created_at preserved, importance never lowered.
    assert_eq!(stored.created_at, original.created_at);
    assert_eq!(stored.importance, 0.8);

    // Still a single row.
    let fetched = store.fetch_candidates("u1", 10).await.unwrap();
    assert_eq!(fetched.len(), 1);
}

#[tokio::test]
async fn test_overwrite_raises_importance() {
    let store = setup_store().await;
    store.upsert(&memory_at("u1", "c1", 0.3, 0)).await.unwrap();

    let stored = store.upsert(&memory_at("u1", "c1", 0.9, 100)).await.unwrap();
    assert_eq!(stored.importance, 0.9);
}

#[tokio::test]
async fn test_touch_accessed_moves_record_to_front() {
    let store = setup_store().await;
    store.upsert(&memory_at("u1", "first", 0.5, 0)).await.unwrap();
    store.upsert(&memory_at("u1", "second", 0.5, 100)).await.unwrap();

    let later = Utc.timestamp_opt(1_700_000_000 + 1000, 0).unwrap();
    store.touch_accessed("first_summary", later).await.unwrap();

    let fetched = store.fetch_candidates("u1", 10).await.unwrap();
    assert_eq!(fetched[0].conversation_id, "first");
    assert_eq!(fetched[0].last_accessed, later);
}

#[tokio::test]
async fn test_records_survive_a_pool_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("mnemo-test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();
        let store = SqliteMemoryStore::new(pool);
        store.run_migrations().await.unwrap();
        store.upsert(&memory_at("u1", "c1", 0.5, 0)).await.unwrap();
        store.pool.close().await;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .unwrap();
    let store = SqliteMemoryStore::new(pool);
    store.run_migrations().await.unwrap();

    let fetched = store.fetch_candidates("u1", 10).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, "c1_summary");
}

#[tokio::test]
async fn test_touch_on_missing_id_is_a_noop() {
    let store = setup_store().await;
    let when = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    // Must not error: the record may have been deleted out of band.
    store.touch_accessed("ghost_summary", when).await.unwrap();
}
