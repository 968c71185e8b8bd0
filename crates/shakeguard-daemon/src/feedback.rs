//! Feedback cue dispatch
//!
//! The core issues opaque tick/success/failure requests; rendering them
//! as vibration and tone belongs to the platform behind this trait.

use async_trait::async_trait;
use tracing::debug;

use shakeguard_core::Feedback;

/// Renderer seam for haptic/audio cues
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Request one cue from the platform
    async fn emit(&self, cue: Feedback);
}

/// Production sink: hands the cue and its waveform to the log stream
///
/// Stands in for the device haptics driver on headless builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

#[async_trait]
impl FeedbackSink for LoggingSink {
    async fn emit(&self, cue: Feedback) {
        debug!(
            ?cue,
            waveform = ?cue.waveform(),
            tone_ms = cue.tone_ms(),
            "feedback cue"
        );
    }
}
