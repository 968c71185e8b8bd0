//! Core sensor, session, and feedback types

use crate::STANDARD_GRAVITY;

/// One raw accelerometer reading
///
/// Samples are ephemeral: produced by the sensor source, consumed once by
/// the detector. `elapsed_ms` is monotonic time, never wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    /// Lateral axis acceleration (m/s^2)
    pub x: f32,
    /// Longitudinal axis acceleration (m/s^2)
    pub y: f32,
    /// Vertical axis acceleration (m/s^2)
    pub z: f32,
    /// Monotonic milliseconds since the sensor stream started
    pub elapsed_ms: u64,
}

impl AccelSample {
    /// Create a new sample
    pub fn new(x: f32, y: f32, z: f32, elapsed_ms: u64) -> Self {
        Self { x, y, z, elapsed_ms }
    }

    /// Magnitude of this sample in multiples of standard gravity
    ///
    /// A device at rest reads close to 1.0 regardless of orientation.
    pub fn g_force(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt() / STANDARD_GRAVITY
    }
}

/// One qualifying shake, accepted at monotonic time `at_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShakeEvent {
    /// Monotonic time the shake was accepted at
    pub at_ms: u64,
}

/// Reason a verification session ended unsuccessfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The countdown ran out before the target was reached
    Timeout,
    /// The user abandoned the attempt
    Cancelled,
}

/// Lifecycle state of a verification session
///
/// Exactly one transition out of `Pending` happens per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Session is live and still consuming shakes and ticks
    Pending,
    /// Target reached inside the window
    Success,
    /// Session ended without reaching the target
    Failed(FailureReason),
}

impl Outcome {
    /// Whether the session has resolved
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }
}

/// Opaque cue requested from the feedback device
///
/// The core only issues these requests; rendering them as vibration and
/// tone is the platform's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Short pulse acknowledging one counted shake
    Tick,
    /// Long-form pattern played when the target is reached
    Success,
    /// Long buzz played on timeout
    Failure,
}

impl Feedback {
    /// Vibration waveform: alternating off/on segment lengths in ms
    pub fn waveform(&self) -> &'static [u64] {
        match self {
            Feedback::Tick => &[0, 100],
            Feedback::Success => &[0, 100, 50, 100, 50, 200],
            Feedback::Failure => &[0, 500],
        }
    }

    /// Tone duration in milliseconds
    pub fn tone_ms(&self) -> u64 {
        match self {
            Feedback::Tick => 100,
            Feedback::Success => 200,
            Feedback::Failure => 500,
        }
    }
}

/// A validated request to move funds
///
/// Only exists to carry context from the request boundary into a
/// verification session; never persisted. Construct via
/// [`crate::Account::prepare_transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    /// Amount to move, in base units; validated to be positive and covered
    pub amount: u64,
}
