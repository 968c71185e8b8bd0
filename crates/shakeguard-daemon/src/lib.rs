//! Shakeguard Daemon - Async orchestration for gesture-verified transfers
//!
//! This crate provides:
//! - Durable storage of the failure/lockout state
//! - Sensor sample fan-out to live verification sessions
//! - The per-session runner task (countdown, shake counting, feedback)
//! - The PIN login gate and the transfer flow that spawns sessions

pub mod clock;
pub mod config;
pub mod error;
pub mod feedback;
pub mod login;
pub mod sensor;
pub mod session;
pub mod store;
pub mod transfer;

pub use clock::{wall_clock_ms, MonotonicClock};
pub use config::DaemonConfig;
pub use error::{DaemonError, Result};
pub use feedback::{FeedbackSink, LoggingSink};
pub use login::{DigitOutcome, LoginGate};
pub use sensor::SensorHub;
pub use session::{Progress, SessionHandle};
pub use store::SecurityStore;
pub use transfer::Verifier;
