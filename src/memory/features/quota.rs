// src/memory/features/quota.rs
// Circuit breaker over the summarization dependency

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::llm::summarizer::SummarizerError;
use crate::memory::core::clock::Clock;

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_quota_errors: u32,
    last_quota_error: Option<DateTime<Utc>>,
    tripped: bool,
}

/// Tracks consecutive quota/rate-limit failures from the summarizer and
/// disables summary generation for a cooldown window once they pile up.
///
/// One instance is shared process-wide: exhaustion is a property of the
/// account, not of any single user or request. Concurrent requests may race
/// on the counters; an extra attempt before tripping or a slightly early
/// trip is acceptable, so a plain mutex suffices.
pub struct QuotaBreaker {
    clock: Arc<dyn Clock>,
    trip_threshold: u32,
    cooldown: Duration,
    state: Mutex<BreakerState>,
}

impl QuotaBreaker {
    pub fn new(clock: Arc<dyn Clock>, trip_threshold: u32, cooldown_secs: i64) -> Self {
        Self {
            clock,
            trip_threshold,
            cooldown: Duration::seconds(cooldown_secs),
            state: Mutex::new(BreakerState::default()),
        }
    }

    /// Record a summarizer failure. Only quota/rate-limit kinds count toward
    /// tripping; auth and generic failures pass through untracked.
    pub fn record_failure(&self, error: &SummarizerError) {
        if !error.counts_against_quota() {
            return;
        }

        let mut state = self.state.lock().expect("breaker mutex poisoned");
        state.consecutive_quota_errors += 1;
        state.last_quota_error = Some(self.clock.now());

        if state.consecutive_quota_errors >= self.trip_threshold && !state.tripped {
            state.tripped = true;
            warn!(
                "Summary generation disabled after {} consecutive quota errors (cooldown {}s)",
                state.consecutive_quota_errors,
                self.cooldown.num_seconds()
            );
        }
    }

    /// Record a successful summarization, clearing the consecutive counter.
    /// An open breaker is unaffected—only the cooldown closes it.
    pub fn record_success(&self) {
        let mut state = self.state.lock().expect("breaker mutex poisoned");
        if !state.tripped {
            state.consecutive_quota_errors = 0;
        }
    }

    /// Whether summarization may be attempted right now. When the breaker is
    /// open and the cooldown has elapsed, it closes and the counter resets.
    pub fn is_allowed(&self) -> bool {
        let mut state = self.state.lock().expect("breaker mutex poisoned");
        if !state.tripped {
            return true;
        }

        let cooled_down = state
            .last_quota_error
            .map(|at| self.clock.now() - at >= self.cooldown)
            .unwrap_or(true);

        if cooled_down {
            info!("Quota breaker cooldown elapsed, re-enabling summary generation");
            state.tripped = false;
            state.consecutive_quota_errors = 0;
            return true;
        }

        false
    }
}
