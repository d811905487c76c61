//! Consolidated Memory Module
//!
//! Unified memory management with:
//! - Core: traits, types, errors, and the injected clock
//! - Features: relevance scoring, offline fallback, quota breaker, triggers
//! - Service: context assembly and summary persistence
//! - Storage: SQLite and in-memory backends

pub mod core;
pub mod features;
pub mod service;
pub mod storage;

// Re-export commonly used items
pub use self::core::clock::{Clock, SystemClock};
pub use self::core::error::MemoryError;
pub use self::core::traits::MemoryStore;
pub use self::core::types::{ConversationMemory, MemoryContext};
pub use self::features::fallback::{FallbackSummary, fallback_summarize};
pub use self::features::quota::QuotaBreaker;
pub use self::features::relevance::{rank_memories, relevance_score};
pub use self::features::triggers::SummaryTriggers;
pub use self::service::MemoryService;
pub use self::storage::memory::InMemoryStore;
pub use self::storage::sqlite::SqliteMemoryStore;
