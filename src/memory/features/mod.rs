// src/memory/features/mod.rs

//! Decision-making pieces of the memory subsystem: relevance scoring,
//! offline summarization fallback, the quota breaker, and trigger policy.

pub mod fallback;
pub mod quota;
pub mod relevance;
pub mod triggers;
