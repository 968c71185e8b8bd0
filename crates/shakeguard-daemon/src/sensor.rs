//! Sensor sample fan-out
//!
//! Broadcast hub between the platform's accelerometer callback and any
//! live verification session. The hub makes no delivery guarantees
//! beyond what the platform gives: the stream may be noisy, may lag, and
//! may stop silently while the device is suspended. Subscribers hold a
//! receiver; dropping it is the unsubscribe, and nothing is delivered
//! after that point.

use tokio::sync::broadcast;

use shakeguard_core::AccelSample;

use crate::clock::MonotonicClock;

/// Fan-out hub for raw accelerometer samples
#[derive(Debug)]
pub struct SensorHub {
    sample_tx: broadcast::Sender<AccelSample>,
    clock: MonotonicClock,
}

impl SensorHub {
    /// Create a hub with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sample_tx, _) = broadcast::channel(capacity);
        Self {
            sample_tx,
            clock: MonotonicClock::new(),
        }
    }

    /// Subscribe to the live sample stream
    pub fn subscribe(&self) -> broadcast::Receiver<AccelSample> {
        self.sample_tx.subscribe()
    }

    /// Publish one raw reading, stamped with monotonic elapsed time
    pub fn publish(&self, x: f32, y: f32, z: f32) -> AccelSample {
        let sample = AccelSample::new(x, y, z, self.clock.elapsed_ms());
        self.publish_sample(sample);
        sample
    }

    /// Publish a pre-stamped sample (replay feeds and tests)
    pub fn publish_sample(&self, sample: AccelSample) {
        // No subscribers is not an error; samples outside a session are dropped
        let _ = self.sample_tx.send(sample);
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.sample_tx.receiver_count()
    }
}
