//! Durable security state
//!
//! Persists the shared failure/lockout counter across sessions and
//! process restarts. Every record call writes through to disk via a
//! temp-file + rename, so a crash can never observe a half-written
//! state. Callers wrap the store in `Arc<RwLock<_>>`; holding the write
//! lock across a record call makes increment-then-maybe-lock one
//! critical section, so two simultaneous failing flows cannot both trip
//! a lockout or corrupt the counter.

use std::path::PathBuf;
use tracing::{info, warn};

use shakeguard_core::LockoutState;

use crate::error::Result;

/// Durable store for the failure/lockout state
pub struct SecurityStore {
    /// File the state is persisted to
    path: PathBuf,

    /// Current state; authoritative between loads
    state: LockoutState,
}

impl SecurityStore {
    /// Open the store, loading existing state if present
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            LockoutState::new()
        };

        Ok(Self { path, state })
    }

    /// Snapshot of the current state (display reads may be stale)
    pub fn state(&self) -> LockoutState {
        self.state
    }

    /// Whether a lockout is in force at the given wall-clock time
    pub fn is_locked_out(&self, now_ms: u64) -> bool {
        self.state.is_locked_out(now_ms)
    }

    /// Milliseconds of lockout left at the given wall-clock time
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.state.remaining_ms(now_ms)
    }

    /// Record one failed attempt and persist
    ///
    /// Returns true when this failure tripped a new lockout.
    pub fn record_failure(&mut self, now_ms: u64) -> Result<bool> {
        let tripped = self.state.record_failure(now_ms);
        self.save()?;
        if tripped {
            warn!(
                until_ms = ?self.state.locked_until_ms,
                "failure limit reached, lockout in force"
            );
        } else {
            info!(attempts = self.state.failed_attempts, "failed attempt recorded");
        }
        Ok(tripped)
    }

    /// Record a successful attempt and persist
    pub fn record_success(&mut self) -> Result<()> {
        self.state.record_success();
        self.save()
    }

    /// Save state to disk
    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.state)?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fresh_store_starts_clean() {
        let temp_dir = TempDir::new().unwrap();
        let store = SecurityStore::open(temp_dir.path().join("security.json")).unwrap();
        assert_eq!(store.state(), LockoutState::new());
        assert!(!store.is_locked_out(0));
    }

    #[test]
    fn recorded_failures_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("security.json");

        let mut store = SecurityStore::open(path.clone()).unwrap();
        store.record_failure(1_000).unwrap();
        store.record_failure(2_000).unwrap();
        drop(store);

        let store = SecurityStore::open(path).unwrap();
        assert_eq!(store.state().failed_attempts, 2);
    }

    #[test]
    fn lockout_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("security.json");
        let now = 1_700_000_000_000;

        let mut store = SecurityStore::open(path.clone()).unwrap();
        for _ in 0..3 {
            store.record_failure(now).unwrap();
        }
        assert!(store.is_locked_out(now + 1));
        drop(store);

        // A restart must not shorten the lockout
        let store = SecurityStore::open(path).unwrap();
        assert!(store.is_locked_out(now + 1));
        assert_eq!(store.remaining_ms(now + 15_000), 45_000);
    }

    #[test]
    fn success_clears_persisted_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("security.json");

        let mut store = SecurityStore::open(path.clone()).unwrap();
        store.record_failure(1_000).unwrap();
        store.record_success().unwrap();
        drop(store);

        let store = SecurityStore::open(path).unwrap();
        assert_eq!(store.state(), LockoutState::new());
    }
}
