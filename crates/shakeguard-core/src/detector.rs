//! Shake gesture detection
//!
//! Turns the raw accelerometer stream into discrete, debounced shake
//! events. The detector is a pure per-sample transform with a single
//! timestamp of memory, so attaching and detaching it can never lose,
//! duplicate, or defer events.

use crate::types::{AccelSample, ShakeEvent};
use crate::{SHAKE_DEBOUNCE_MS, SHAKE_THRESHOLD_G};

/// Result of feeding one sample through the detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOutput {
    /// Raw (x, y) axis values, forwarded on every sample for display
    pub tilt: (f32, f32),

    /// The shake this sample produced, if it qualified
    pub shake: Option<ShakeEvent>,
}

/// Debounced G-force shake detector
///
/// A sample qualifies when its magnitude exceeds [`SHAKE_THRESHOLD_G`]
/// (resting gravity reads ~1.0 and never triggers) and at least
/// [`SHAKE_DEBOUNCE_MS`] of monotonic time have elapsed since the last
/// accepted shake. Threshold and debounce window are fixed, not tunable.
#[derive(Debug, Clone, Default)]
pub struct ShakeDetector {
    last_shake_ms: Option<u64>,
}

impl ShakeDetector {
    /// Create a detector with no shake history
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample
    ///
    /// Axis values are always forwarded, independent of the threshold
    /// check and not debounced.
    pub fn process_sample(&mut self, sample: &AccelSample) -> SampleOutput {
        let tilt = (sample.x, sample.y);

        let strong = sample.g_force() > SHAKE_THRESHOLD_G;
        let clear_of_debounce = match self.last_shake_ms {
            Some(last) => sample.elapsed_ms.saturating_sub(last) >= SHAKE_DEBOUNCE_MS,
            None => true,
        };

        let shake = if strong && clear_of_debounce {
            self.last_shake_ms = Some(sample.elapsed_ms);
            Some(ShakeEvent {
                at_ms: sample.elapsed_ms,
            })
        } else {
            None
        };

        SampleOutput { tilt, shake }
    }
}
