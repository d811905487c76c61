// src/memory/features/fallback.rs
// Offline summary generation for when the LLM summarizer is unavailable

use once_cell::sync::Lazy;
use regex::Regex;

use crate::llm::summarizer::ChatMessage;

/// Words this short carry no topical signal.
const MIN_TOPIC_WORD_LEN: usize = 4;
const MAX_TOPICS: usize = 5;
const SUMMARY_TOPIC_COUNT: usize = 3;
const EXCERPT_MAX_CHARS: usize = 50;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

/// Degraded summary produced without the LLM.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackSummary {
    pub summary: String,
    pub key_topics: Vec<String>,
}

/// Produce a deterministic summary and topic list from raw transcript text.
///
/// Topics are the most frequent words of length >= 4 after lowercasing and
/// stripping punctuation; frequency ties keep first-encountered order, so
/// identical input always yields identical output.
pub fn fallback_summarize(messages: &[ChatMessage]) -> FallbackSummary {
    let combined = messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let lowercased = combined.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowercased, "");

    // Count word frequency, remembering first-seen order for stable ties.
    let mut order: Vec<String> = Vec::new();
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for word in cleaned.split_whitespace() {
        if word.len() < MIN_TOPIC_WORD_LEN {
            continue;
        }
        let entry = counts.entry(word.to_string()).or_insert(0);
        if *entry == 0 {
            order.push(word.to_string());
        }
        *entry += 1;
    }

    // Sort by count descending; the sort is stable over first-seen order,
    // so ties resolve to whichever word appeared first.
    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| {
            let count = counts[&word];
            (word, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let key_topics: Vec<String> = ranked
        .into_iter()
        .take(MAX_TOPICS)
        .map(|(word, _)| word)
        .collect();

    let summary = build_summary(&key_topics, messages);

    FallbackSummary {
        summary,
        key_topics,
    }
}

fn build_summary(topics: &[String], messages: &[ChatMessage]) -> String {
    let mut summary = if topics.is_empty() {
        "Short conversation with no recurring topics".to_string()
    } else {
        format!(
            "Conversation about {}",
            topics
                .iter()
                .take(SUMMARY_TOPIC_COUNT)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        )
    };

    // Bracket the summary with the opening and closing turns when available.
    if let (Some(first), Some(last)) = (messages.first(), messages.last()) {
        if !first.content.is_empty() && !last.content.is_empty() {
            summary.push_str(&format!(
                ". Started with \"{}\" and ended with \"{}\"",
                truncate_chars(&first.content, EXCERPT_MAX_CHARS),
                truncate_chars(&last.content, EXCERPT_MAX_CHARS),
            ));
        }
    }

    summary
}

/// Truncate on a char boundary, never mid-codepoint.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
