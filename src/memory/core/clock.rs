// src/memory/core/clock.rs

use chrono::{DateTime, Utc};

/// Time source injected into the service and quota breaker so cooldown
/// arithmetic and `last_accessed` stamping are deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
