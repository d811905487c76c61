// src/memory/features/triggers.rs
// Message-count policy for when summaries are attempted or persisted

use crate::config::MnemoConfig;

/// Decides when the conversation is long enough to summarize.
///
/// Two independent cadences exist: a 5-message threshold for the best-effort
/// rolling snapshot inside `build_context`, and an 8-message threshold for
/// the caller's post-turn persisted summary. They are kept as separate knobs
/// on purpose; unifying them would change observable summary cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryTriggers {
    pub rolling_snapshot_threshold: usize,
    pub persist_summary_threshold: usize,
}

impl SummaryTriggers {
    pub fn from_config(config: &MnemoConfig) -> Self {
        Self {
            rolling_snapshot_threshold: config.rolling_snapshot_threshold,
            persist_summary_threshold: config.persist_summary_threshold,
        }
    }

    /// Should `build_context` attempt a rolling snapshot this turn?
    pub fn should_attempt_rolling(&self, message_count: usize) -> bool {
        message_count >= self.rolling_snapshot_threshold
    }

    /// Should the caller persist a conversation summary after this turn?
    pub fn should_persist_summary(&self, message_count: usize) -> bool {
        message_count >= self.persist_summary_threshold
    }
}

impl Default for SummaryTriggers {
    fn default() -> Self {
        Self {
            rolling_snapshot_threshold: 5,
            persist_summary_threshold: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_threshold() {
        let triggers = SummaryTriggers::default();
        assert!(!triggers.should_attempt_rolling(4));
        assert!(triggers.should_attempt_rolling(5));
    }

    #[test]
    fn test_persist_threshold() {
        let triggers = SummaryTriggers::default();
        assert!(!triggers.should_persist_summary(7));
        assert!(triggers.should_persist_summary(8));
    }

    #[test]
    fn test_thresholds_are_independent() {
        let triggers = SummaryTriggers::default();
        // Between the two thresholds: rolling yes, persist no.
        assert!(triggers.should_attempt_rolling(6));
        assert!(!triggers.should_persist_summary(6));
    }
}
