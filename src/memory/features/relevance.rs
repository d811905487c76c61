// src/memory/features/relevance.rs
// Lexical relevance scoring between the current message and stored memories

use std::collections::HashSet;

use crate::memory::core::types::ConversationMemory;

/// Score a stored memory against the current message.
///
/// Lowercased word-overlap ratio weighted by the memory's importance:
/// the fraction of query words that appear anywhere in the memory's
/// key topics or summary, times `importance`. Exact token match only —
/// this is a cheap lexical heuristic, not semantic search, so callers
/// must not expect synonym or paraphrase matching.
pub fn relevance_score(query: &str, memory: &ConversationMemory) -> f32 {
    let query_lower = query.to_lowercase();
    let query_words: Vec<&str> = query_lower.split_whitespace().collect();
    if query_words.is_empty() {
        return 0.0;
    }

    let bag_text = format!("{} {}", memory.key_topics.join(" "), memory.summary).to_lowercase();
    let memory_words: HashSet<&str> = bag_text.split_whitespace().collect();

    let matches = query_words
        .iter()
        .filter(|word| memory_words.contains(**word))
        .count();

    (matches as f32 / query_words.len() as f32) * memory.importance
}

/// Rank candidates by descending relevance and keep the top `limit`.
///
/// The sort is stable, so score ties keep the store's retrieval order
/// (most recently accessed first). Zero-score candidates are not filtered;
/// with few memories stored, a weak match still beats no context.
pub fn rank_memories(
    query: &str,
    candidates: Vec<ConversationMemory>,
    limit: usize,
) -> Vec<ConversationMemory> {
    let mut scored: Vec<(f32, ConversationMemory)> = candidates
        .into_iter()
        .map(|memory| (relevance_score(query, &memory), memory))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, memory)| memory)
        .collect()
}
