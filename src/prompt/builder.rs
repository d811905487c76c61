// src/prompt/builder.rs

use crate::memory::core::types::MemoryContext;

const SYSTEM_PREAMBLE: &str = "You are a helpful AI assistant with access to conversation history \
     and memory. Your goal is to provide helpful, accurate, and contextually relevant responses.";

/// Builds the outbound chat prompt from the memory context and the user's
/// new message. Empty context blocks are omitted entirely rather than
/// rendered as empty headings.
pub fn build_chat_prompt(context: &MemoryContext, message: &str, recent_window: usize) -> String {
    let mut prompt = String::new();

    prompt.push_str(SYSTEM_PREAMBLE);
    prompt.push_str("\n\n");

    if !context.user_context.is_empty() {
        prompt.push_str("Previous relevant conversations:\n");
        prompt.push_str(&context.user_context);
        prompt.push_str("\n\n");
    }

    if !context.conversation_summary.is_empty() {
        prompt.push_str("Current conversation summary:\n");
        prompt.push_str(&context.conversation_summary);
        prompt.push_str("\n\n");
    }

    if !context.recent_messages.is_empty() {
        let start = context.recent_messages.len().saturating_sub(recent_window);
        prompt.push_str("Recent conversation:\n");
        prompt.push_str(&context.recent_messages[start..].join("\n"));
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!("Human: {}\n\nAI Assistant:", message));
    prompt
}
