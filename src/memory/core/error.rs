// src/memory/core/error.rs

/// Memory operation error types.
///
/// `build_context` can only fail with `InvalidInput`; every dependency
/// failure inside it degrades to partial output instead. `Persistence`
/// surfaces solely from the final summary write in `create_summary`,
/// where silently dropping the record has no safe fallback.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<anyhow::Error> for MemoryError {
    fn from(err: anyhow::Error) -> Self {
        MemoryError::Persistence(err.to_string())
    }
}
