//! Transfer flow orchestration
//!
//! Gates a transfer request on the lockout policy and the balance, then
//! spawns the verification session that must resolve before any funds
//! move.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use shakeguard_core::{Account, VerificationSession};

use crate::clock::wall_clock_ms;
use crate::error::{DaemonError, Result};
use crate::feedback::FeedbackSink;
use crate::sensor::SensorHub;
use crate::session::{self, SessionHandle};
use crate::store::SecurityStore;

/// Spawns gesture verification for transfer requests
pub struct Verifier {
    store: Arc<RwLock<SecurityStore>>,
    account: Arc<RwLock<Account>>,
    hub: Arc<SensorHub>,
    feedback: Arc<dyn FeedbackSink>,
}

impl Verifier {
    /// Create a new verifier over the shared components
    pub fn new(
        store: Arc<RwLock<SecurityStore>>,
        account: Arc<RwLock<Account>>,
        hub: Arc<SensorHub>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            store,
            account,
            hub,
            feedback,
        }
    }

    /// Balance snapshot for display
    pub async fn balance(&self) -> u64 {
        self.account.read().await.balance()
    }

    /// Gate, validate, and start one verification session
    ///
    /// A rejection here is never charged to the failure counter: a
    /// lockout refusal is a policy rejection and a bad amount is a
    /// boundary rejection.
    pub async fn begin(&self, amount: u64) -> Result<SessionHandle> {
        let now = wall_clock_ms();

        // 1. Policy gate: no session may be created while locked out
        {
            let store = self.store.read().await;
            if store.is_locked_out(now) {
                return Err(DaemonError::LockedOut {
                    remaining_ms: store.remaining_ms(now),
                });
            }
        }

        // 2. Boundary validation against the current balance
        let request = self.account.read().await.prepare_transfer(amount)?;

        // 3. Fresh target for this attempt, never reused
        let session = VerificationSession::with_random_target(&mut rand::thread_rng());
        info!(
            target = session.target(),
            amount = request.amount,
            "verification session starting"
        );

        // 4. Hand off to the runner, subscribed to the live sensor stream
        Ok(session::spawn(
            &self.hub,
            Arc::clone(&self.store),
            Arc::clone(&self.account),
            Arc::clone(&self.feedback),
            request,
            session,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::feedback::LoggingSink;

    fn verifier(balance: u64) -> (TempDir, Verifier, Arc<RwLock<SecurityStore>>) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(RwLock::new(
            SecurityStore::open(temp_dir.path().join("security.json")).unwrap(),
        ));
        let verifier = Verifier::new(
            Arc::clone(&store),
            Arc::new(RwLock::new(Account::new(balance))),
            Arc::new(SensorHub::new(64)),
            Arc::new(LoggingSink),
        );
        (temp_dir, verifier, store)
    }

    #[tokio::test]
    async fn zero_amount_is_rejected_at_the_boundary() {
        let (_t, verifier, store) = verifier(1_000);
        assert!(matches!(
            verifier.begin(0).await,
            Err(DaemonError::Core(shakeguard_core::Error::InvalidAmount))
        ));
        assert_eq!(store.read().await.state().failed_attempts, 0);
    }

    #[tokio::test]
    async fn overdraft_is_rejected_at_the_boundary() {
        let (_t, verifier, _store) = verifier(1_000);
        assert!(matches!(
            verifier.begin(2_000).await,
            Err(DaemonError::Core(
                shakeguard_core::Error::InsufficientFunds { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn locked_out_requests_are_refused_without_counting() {
        let (_t, verifier, store) = verifier(1_000);
        {
            let mut store = store.write().await;
            let now = wall_clock_ms();
            for _ in 0..3 {
                store.record_failure(now).unwrap();
            }
        }

        let result = verifier.begin(500).await;
        match result {
            Err(DaemonError::LockedOut { remaining_ms }) => {
                assert!(remaining_ms > 0);
            }
            other => panic!("expected lockout rejection, got {:?}", other.map(|h| h.target())),
        }
        // Refusal is a policy rejection, not a chargeable failure
        assert_eq!(store.read().await.state().failed_attempts, 0);
    }

    #[tokio::test]
    async fn accepted_requests_roll_a_target_in_range() {
        let (_t, verifier, _store) = verifier(1_000_000);
        for _ in 0..20 {
            let handle = verifier.begin(1).await.unwrap();
            let target = handle.target();
            assert!((1..=5).contains(&target));
            handle.cancel();
            let _ = handle.outcome().await;
        }
    }
}
