//! Failure counting and timed lockout policy
//!
//! One counter is shared by PIN entry and shake verification: three
//! consecutive failures from either path trip a 60 second lockout. The
//! policy is pure; callers pass wall-clock time in explicitly and the
//! daemon's `SecurityStore` handles persistence.

use serde::{Deserialize, Serialize};

use crate::{LOCKOUT_DURATION_MS, MAX_FAILED_ATTEMPTS};

/// Persisted record of failed attempts and any lockout in force
///
/// Invariant: while a lockout is in force the counter is frozen at zero;
/// the counter and an active lockout are never both live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutState {
    /// Consecutive failed attempts since the last success or lockout
    pub failed_attempts: u32,

    /// Wall-clock epoch milliseconds the current lockout expires at
    ///
    /// A past value is inert: gating always goes through
    /// [`is_locked_out`](Self::is_locked_out).
    pub locked_until_ms: Option<u64>,
}

impl LockoutState {
    /// Fresh state: no failures, no lockout
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a lockout is in force at the given wall-clock time
    pub fn is_locked_out(&self, now_ms: u64) -> bool {
        matches!(self.locked_until_ms, Some(until) if now_ms < until)
    }

    /// Milliseconds of lockout left, 0 when none is in force
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.locked_until_ms
            .map(|until| until.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    /// Record one failed attempt
    ///
    /// Returns true when this failure tripped a new lockout, in which case
    /// the counter resets to zero. A failure reported while a lockout is
    /// already in force is ignored; attempts are not reachable while locked
    /// out, so this only guards against misuse.
    pub fn record_failure(&mut self, now_ms: u64) -> bool {
        if self.is_locked_out(now_ms) {
            return false;
        }
        self.failed_attempts += 1;
        if self.failed_attempts >= MAX_FAILED_ATTEMPTS {
            self.locked_until_ms = Some(now_ms + LOCKOUT_DURATION_MS);
            self.failed_attempts = 0;
            return true;
        }
        false
    }

    /// Record a successful attempt: counter and expiry are both cleared
    pub fn record_success(&mut self) {
        self.failed_attempts = 0;
        self.locked_until_ms = None;
    }

    /// Human-readable remaining time for display, `1m 5s` past the minute
    pub fn format_remaining(&self, now_ms: u64) -> String {
        let seconds = self.remaining_ms(now_ms) / 1000;
        let minutes = seconds / 60;
        let rest = seconds % 60;
        if minutes > 0 {
            format!("{}m {}s", minutes, rest)
        } else {
            format!("{}s", rest)
        }
    }
}
