//! Time sources
//!
//! Lockout expiry uses wall-clock time so a restart cannot shorten a
//! lockout; debounce comparisons and sample timestamps use monotonic
//! time. The two are never conflated.

use std::time::Instant;

/// Current wall-clock time as epoch milliseconds
pub fn wall_clock_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Monotonic elapsed-millisecond source for stamping sensor samples
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    started: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Clock starting at zero now
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}
