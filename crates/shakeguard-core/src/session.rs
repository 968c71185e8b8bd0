//! Verification session state machine
//!
//! One session is one attempt: a freshly rolled shake target, a 20 second
//! countdown, and a single terminal transition to success, timeout, or
//! cancellation. Shakes and ticks are applied through `&mut self`, so the
//! caller that owns the session (the daemon's runner task) serializes the
//! two producers and no pair of inputs can both observe a pending session
//! and both complete it.

use rand::Rng;

use crate::types::{FailureReason, Outcome};
use crate::{MAX_TARGET_SHAKES, MIN_TARGET_SHAKES, VERIFY_WINDOW_SECS};

/// What one input did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Input arrived after the terminal transition and was dropped
    Ignored,
    /// A shake was counted; the target has not been reached yet
    Counted { count: u8, target: u8 },
    /// The counted shake reached the target
    Succeeded,
    /// One second elapsed with time still on the clock
    Ticked { remaining_secs: u32 },
    /// The countdown ran out short of the target
    TimedOut,
    /// The attempt was abandoned
    Cancelled,
}

impl Step {
    /// Whether this step ended the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Succeeded | Step::TimedOut | Step::Cancelled)
    }
}

/// One verification attempt: target, progress, countdown, outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSession {
    target: u8,
    count: u8,
    remaining_secs: u32,
    outcome: Outcome,
}

impl VerificationSession {
    /// Start a session demanding `target` shakes
    pub fn new(target: u8) -> Self {
        debug_assert!((MIN_TARGET_SHAKES..=MAX_TARGET_SHAKES).contains(&target));
        Self {
            target,
            count: 0,
            remaining_secs: VERIFY_WINDOW_SECS,
            outcome: Outcome::Pending,
        }
    }

    /// Start a session with a freshly rolled target, uniform in 1..=5
    ///
    /// Targets are rolled per session and never reused.
    pub fn with_random_target<R: Rng>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(MIN_TARGET_SHAKES..=MAX_TARGET_SHAKES))
    }

    /// Shakes demanded by this session
    pub fn target(&self) -> u8 {
        self.target
    }

    /// Shakes counted so far
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Seconds left on the countdown
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Current outcome
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Apply one accepted shake
    ///
    /// Counts the shake and resolves to success when the target is
    /// reached. Dropped without effect after the terminal transition, so
    /// late events cannot double-count or resurrect a finished session.
    pub fn apply_shake(&mut self) -> Step {
        if self.outcome.is_terminal() {
            return Step::Ignored;
        }
        self.count += 1;
        if self.count >= self.target {
            self.outcome = Outcome::Success;
            Step::Succeeded
        } else {
            Step::Counted {
                count: self.count,
                target: self.target,
            }
        }
    }

    /// Apply one elapsed second of the countdown
    ///
    /// Resolves to `Failed(Timeout)` when the clock reaches zero with the
    /// target unmet. The shake-count condition is sampled in the same
    /// mutation, so a timeout can never fire on a session a shake already
    /// resolved.
    pub fn tick(&mut self) -> Step {
        if self.outcome.is_terminal() {
            return Step::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.outcome = Outcome::Failed(FailureReason::Timeout);
            Step::TimedOut
        } else {
            Step::Ticked {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Abandon the attempt
    ///
    /// Cancellation is not a verification failure: it carries no lockout
    /// effect and emits no cue.
    pub fn cancel(&mut self) -> Step {
        if self.outcome.is_terminal() {
            return Step::Ignored;
        }
        self.outcome = Outcome::Failed(FailureReason::Cancelled);
        Step::Cancelled
    }
}
