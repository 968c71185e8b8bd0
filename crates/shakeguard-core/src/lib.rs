//! Shakeguard Core - Shared types, lockout policy, and verification state machine
//!
//! This crate provides the foundational types for the Shakeguard
//! gesture-verified transaction authorization system: the shake detector,
//! the verification session state machine, the failure/lockout policy, and
//! access code handling. Everything here is pure and I/O-free; persistence
//! and scheduling live in `shakeguard-daemon`.

pub mod account;
pub mod detector;
pub mod error;
pub mod lockout;
pub mod pin;
pub mod session;
pub mod types;

pub use account::Account;
pub use detector::{SampleOutput, ShakeDetector};
pub use error::{Error, Result};
pub use lockout::LockoutState;
pub use pin::PinBuffer;
pub use session::{Step, VerificationSession};
pub use types::{AccelSample, FailureReason, Feedback, Outcome, ShakeEvent, TransferRequest};

/// Standard gravity used to normalize sensor magnitudes (m/s^2)
pub const STANDARD_GRAVITY: f32 = 9.81;

/// G-force a sample must exceed to qualify as a shake
pub const SHAKE_THRESHOLD_G: f32 = 1.5;

/// Minimum spacing between two accepted shakes (monotonic milliseconds)
pub const SHAKE_DEBOUNCE_MS: u64 = 100;

/// Length of the verification countdown in seconds
pub const VERIFY_WINDOW_SECS: u32 = 20;

/// Smallest shake target a session may roll
pub const MIN_TARGET_SHAKES: u8 = 1;

/// Largest shake target a session may roll
pub const MAX_TARGET_SHAKES: u8 = 5;

/// Consecutive failures that trip a lockout
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

/// How long a tripped lockout lasts (wall-clock milliseconds)
pub const LOCKOUT_DURATION_MS: u64 = 60_000;

/// Number of digits in the access code
pub const ACCESS_CODE_LEN: usize = 6;

/// Opening balance for a fresh account, in base units
pub const STARTING_BALANCE: u64 = 1_000_000;
