// src/llm/mod.rs
// LLM module exports and submodule declarations

pub mod openai;
pub mod summarizer;

pub use openai::OpenAiSummarizer;
pub use summarizer::{ChatMessage, Summarizer, SummarizerError};
