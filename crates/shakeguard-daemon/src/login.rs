//! PIN login gate
//!
//! Digit-by-digit access code entry in front of the transfer flow. The
//! lockout is consulted before every digit, not just at submission:
//! while a lockout is in force, keys do nothing at all, with no
//! buffering and no counter effect. A full-length candidate submits
//! itself; there is no explicit submit action.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shakeguard_core::PinBuffer;

use crate::clock::wall_clock_ms;
use crate::error::Result;
use crate::store::SecurityStore;

/// What one keypad press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitOutcome {
    /// A lockout is in force; the digit was rejected outright
    LockedOut { remaining_ms: u64 },
    /// Not a digit; nothing was buffered
    Ignored,
    /// Digit buffered; the candidate is not complete yet
    Buffered { entered: usize },
    /// Full candidate matched; navigation is unlocked
    Accepted,
    /// Full candidate rejected; the buffer was cleared for re-entry
    Rejected { lockout_tripped: bool },
}

/// Gate between the keypad and the rest of the flow
pub struct LoginGate {
    store: Arc<RwLock<SecurityStore>>,
    buffer: PinBuffer,
    unlocked: bool,
}

impl LoginGate {
    /// Gate backed by the shared security store
    pub fn new(store: Arc<RwLock<SecurityStore>>) -> Self {
        Self {
            store,
            buffer: PinBuffer::new(),
            unlocked: false,
        }
    }

    /// Whether a correct code has been entered
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Digits currently buffered (for the entry dots)
    pub fn entered(&self) -> usize {
        self.buffer.len()
    }

    /// Feed one keypad digit
    pub async fn push_digit(&mut self, digit: u8) -> Result<DigitOutcome> {
        let now = wall_clock_ms();
        {
            let store = self.store.read().await;
            if store.is_locked_out(now) {
                debug!("digit rejected, lockout in force");
                return Ok(DigitOutcome::LockedOut {
                    remaining_ms: store.remaining_ms(now),
                });
            }
        }

        if !self.buffer.push(digit) {
            return Ok(DigitOutcome::Ignored);
        }
        if !self.buffer.is_complete() {
            return Ok(DigitOutcome::Buffered {
                entered: self.buffer.len(),
            });
        }

        // Full length reached: the candidate submits itself
        let matched = self.buffer.matches();
        self.buffer.clear();

        if matched {
            self.store.write().await.record_success()?;
            self.unlocked = true;
            info!("access code accepted");
            Ok(DigitOutcome::Accepted)
        } else {
            let tripped = self.store.write().await.record_failure(now)?;
            warn!(lockout_tripped = tripped, "access code rejected");
            Ok(DigitOutcome::Rejected {
                lockout_tripped: tripped,
            })
        }
    }

    /// Keypad backspace; rejected while locked out, like any other key
    pub async fn pop_digit(&mut self) -> bool {
        let now = wall_clock_ms();
        if self.store.read().await.is_locked_out(now) {
            return false;
        }
        self.buffer.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn gate() -> (TempDir, LoginGate, Arc<RwLock<SecurityStore>>) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(RwLock::new(
            SecurityStore::open(temp_dir.path().join("security.json")).unwrap(),
        ));
        let gate = LoginGate::new(Arc::clone(&store));
        (temp_dir, gate, store)
    }

    async fn enter(gate: &mut LoginGate, digits: &[u8]) -> DigitOutcome {
        let mut last = DigitOutcome::Ignored;
        for &d in digits {
            last = gate.push_digit(d).await.unwrap();
        }
        last
    }

    #[tokio::test]
    async fn correct_code_unlocks() {
        let (_t, mut gate, store) = gate();
        // A stale failure streak is wiped by the success
        store.write().await.record_failure(0).unwrap();

        let outcome = enter(&mut gate, &[7, 1, 1, 5, 2, 0]).await;
        assert_eq!(outcome, DigitOutcome::Accepted);
        assert!(gate.is_unlocked());
        assert_eq!(store.read().await.state().failed_attempts, 0);
    }

    #[tokio::test]
    async fn wrong_code_counts_a_failure_and_clears_the_buffer() {
        let (_t, mut gate, store) = gate();

        let outcome = enter(&mut gate, &[1, 2, 3, 4, 5, 6]).await;
        assert_eq!(
            outcome,
            DigitOutcome::Rejected {
                lockout_tripped: false
            }
        );
        assert!(!gate.is_unlocked());
        assert_eq!(gate.entered(), 0);
        assert_eq!(store.read().await.state().failed_attempts, 1);
    }

    #[tokio::test]
    async fn third_wrong_code_trips_the_lockout() {
        let (_t, mut gate, store) = gate();

        enter(&mut gate, &[1, 2, 3, 4, 5, 6]).await;
        enter(&mut gate, &[1, 2, 3, 4, 5, 6]).await;
        let outcome = enter(&mut gate, &[1, 2, 3, 4, 5, 6]).await;
        assert_eq!(
            outcome,
            DigitOutcome::Rejected {
                lockout_tripped: true
            }
        );
        assert!(store.read().await.is_locked_out(wall_clock_ms()));
    }

    #[tokio::test]
    async fn digits_during_lockout_have_no_effect() {
        let (_t, mut gate, store) = gate();
        for _ in 0..3 {
            enter(&mut gate, &[1, 2, 3, 4, 5, 6]).await;
        }

        let before = store.read().await.state();
        let outcome = gate.push_digit(7).await.unwrap();
        assert!(matches!(outcome, DigitOutcome::LockedOut { .. }));
        assert_eq!(gate.entered(), 0);
        assert!(!gate.pop_digit().await);
        assert_eq!(store.read().await.state(), before);
    }

    #[tokio::test]
    async fn backspace_reopens_a_slot() {
        let (_t, mut gate, _store) = gate();

        enter(&mut gate, &[7, 1, 1, 5, 2]).await;
        assert!(gate.pop_digit().await);
        assert_eq!(gate.entered(), 4);

        // Finish with the corrected tail
        let outcome = enter(&mut gate, &[2, 0]).await;
        assert_eq!(outcome, DigitOutcome::Accepted);
    }

    #[tokio::test]
    async fn non_digit_input_is_ignored() {
        let (_t, mut gate, store) = gate();
        assert_eq!(gate.push_digit(12).await.unwrap(), DigitOutcome::Ignored);
        assert_eq!(gate.entered(), 0);
        assert_eq!(store.read().await.state().failed_attempts, 0);
    }
}
