//! Error types for the Shakeguard daemon

use thiserror::Error;

/// Result type alias for daemon operations
pub type Result<T> = std::result::Result<T, DaemonError>;

/// Errors that can occur in the daemon
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] shakeguard_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A lockout is in force; the action was rejected without being counted
    #[error("Account locked, {remaining_ms} ms remaining")]
    LockedOut { remaining_ms: u64 },

    /// The session task went away before resolving an outcome
    #[error("Session ended without reporting an outcome")]
    SessionDropped,
}

impl From<serde_json::Error> for DaemonError {
    fn from(e: serde_json::Error) -> Self {
        DaemonError::Serialization(e.to_string())
    }
}
