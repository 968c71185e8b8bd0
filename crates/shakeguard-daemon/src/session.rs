//! Verification session runner
//!
//! Owns one verification attempt end to end: subscribes to the sensor
//! hub, runs the one-second countdown, serializes both producers into
//! the state machine, and releases every resource exactly once on
//! whichever path ends the attempt. The runner task is the single
//! consumer: ticks, samples, and cancellation are applied strictly one
//! at a time, so no two of them can both observe a pending session and
//! both complete it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, oneshot, watch, RwLock};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shakeguard_core::{
    Account, AccelSample, Feedback, Outcome, ShakeDetector, Step, TransferRequest,
    VerificationSession,
};

use crate::clock::wall_clock_ms;
use crate::error::{DaemonError, Result};
use crate::feedback::FeedbackSink;
use crate::sensor::SensorHub;
use crate::store::SecurityStore;

/// Progress snapshot for display surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Shakes counted so far
    pub count: u8,
    /// Shakes this session demands
    pub target: u8,
    /// Seconds left on the countdown
    pub remaining_secs: u32,
}

/// Handle to one running verification session
///
/// Dropping the handle without resolving it abandons the attempt: the
/// runner observes the closed cancel channel and winds the session down
/// as cancelled, with no lockout effect.
pub struct SessionHandle {
    id: Uuid,
    target: u8,
    progress_rx: watch::Receiver<Progress>,
    tilt_rx: watch::Receiver<(f32, f32)>,
    cancel_tx: watch::Sender<bool>,
    outcome_rx: oneshot::Receiver<Outcome>,
}

impl SessionHandle {
    /// Session identifier, for logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Shake target this session rolled
    pub fn target(&self) -> u8 {
        self.target
    }

    /// Latest progress snapshot
    pub fn progress(&self) -> Progress {
        *self.progress_rx.borrow()
    }

    /// Watch channel of progress updates
    pub fn progress_watch(&self) -> watch::Receiver<Progress> {
        self.progress_rx.clone()
    }

    /// Latest raw (x, y) tilt values, forwarded on every sample
    pub fn tilt(&self) -> (f32, f32) {
        *self.tilt_rx.borrow()
    }

    /// Watch channel of tilt updates
    pub fn tilt_watch(&self) -> watch::Receiver<(f32, f32)> {
        self.tilt_rx.clone()
    }

    /// Ask the session to stop
    ///
    /// Idempotent, and harmless after the outcome has been reached.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Wait for the terminal outcome
    pub async fn outcome(self) -> Result<Outcome> {
        self.outcome_rx
            .await
            .map_err(|_| DaemonError::SessionDropped)
    }
}

/// Spawn the runner task for a freshly created session
///
/// The caller is responsible for gating on the lockout before creating
/// the session; the runner does not re-check it mid-flight. Prefer
/// [`crate::Verifier::begin`], which performs the gating and validation.
pub fn spawn(
    hub: &SensorHub,
    store: Arc<RwLock<SecurityStore>>,
    account: Arc<RwLock<Account>>,
    feedback: Arc<dyn FeedbackSink>,
    request: TransferRequest,
    session: VerificationSession,
) -> SessionHandle {
    let id = Uuid::new_v4();
    let target = session.target();

    let (progress_tx, progress_rx) = watch::channel(Progress {
        count: 0,
        target,
        remaining_secs: session.remaining_secs(),
    });
    let (tilt_tx, tilt_rx) = watch::channel((0.0, 0.0));
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let (outcome_tx, outcome_rx) = oneshot::channel();

    let runner = Runner {
        id,
        session,
        detector: ShakeDetector::new(),
        samples: hub.subscribe(),
        sensor_live: true,
        store,
        account,
        feedback,
        request,
        progress_tx,
        tilt_tx,
        cancel_rx,
    };

    tokio::spawn(async move {
        let outcome = runner.run().await;
        // Sending can only fail when the handle is gone, which is fine
        let _ = outcome_tx.send(outcome);
        // The broadcast receiver and the ticker drop with the runner
        // here: detachment happens exactly once, on every ending path.
    });

    SessionHandle {
        id,
        target,
        progress_rx,
        tilt_rx,
        cancel_tx,
        outcome_rx,
    }
}

/// The single consumer that owns the session state machine
struct Runner {
    id: Uuid,
    session: VerificationSession,
    detector: ShakeDetector,
    samples: broadcast::Receiver<AccelSample>,
    sensor_live: bool,
    store: Arc<RwLock<SecurityStore>>,
    account: Arc<RwLock<Account>>,
    feedback: Arc<dyn FeedbackSink>,
    request: TransferRequest,
    progress_tx: watch::Sender<Progress>,
    tilt_tx: watch::Sender<(f32, f32)>,
    cancel_rx: watch::Receiver<bool>,
}

impl Runner {
    async fn run(mut self) -> Outcome {
        let mut ticker = time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval yields immediately; that is not an elapsed second
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(outcome) = self.on_tick().await {
                        return outcome;
                    }
                }
                received = self.samples.recv(), if self.sensor_live => {
                    match received {
                        Ok(sample) => {
                            if let Some(outcome) = self.on_sample(&sample).await {
                                return outcome;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(session = %self.id, skipped, "sensor stream lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            // Suspended or torn down; the countdown still runs
                            warn!(session = %self.id, "sensor stream stopped");
                            self.sensor_live = false;
                        }
                    }
                }
                changed = self.cancel_rx.changed() => {
                    // A closed channel means the handle was dropped;
                    // either way the attempt is abandoned.
                    let _ = changed;
                    if self.session.cancel() == Step::Cancelled {
                        info!(session = %self.id, "verification cancelled");
                        return self.session.outcome();
                    }
                }
            }
        }
    }

    /// One elapsed second of the countdown
    async fn on_tick(&mut self) -> Option<Outcome> {
        match self.session.tick() {
            Step::Ticked { remaining_secs } => {
                self.progress_tx.send_modify(|p| p.remaining_secs = remaining_secs);
                None
            }
            Step::TimedOut => {
                self.progress_tx.send_modify(|p| p.remaining_secs = 0);
                self.feedback.emit(Feedback::Failure).await;
                let now = wall_clock_ms();
                if let Err(e) = self.store.write().await.record_failure(now) {
                    error!(session = %self.id, error = %e, "failed to persist failure");
                }
                info!(session = %self.id, count = self.session.count(), target = self.session.target(), "verification timed out");
                Some(self.session.outcome())
            }
            _ => None,
        }
    }

    /// One raw sensor sample
    async fn on_sample(&mut self, sample: &AccelSample) -> Option<Outcome> {
        let output = self.detector.process_sample(sample);
        // Tilt is forwarded on every sample, qualifying or not
        let _ = self.tilt_tx.send(output.tilt);
        if output.shake.is_none() {
            return None;
        }

        match self.session.apply_shake() {
            Step::Counted { count, target } => {
                self.feedback.emit(Feedback::Tick).await;
                self.progress_tx.send_modify(|p| p.count = count);
                debug!(session = %self.id, count, target, "shake counted");
                None
            }
            Step::Succeeded => {
                // The final shake still gets its tick before the
                // long-form success cue.
                self.feedback.emit(Feedback::Tick).await;
                self.feedback.emit(Feedback::Success).await;
                self.progress_tx.send_modify(|p| p.count = self.session.count());

                {
                    let mut account = self.account.write().await;
                    account.apply_transfer(&self.request);
                    info!(
                        session = %self.id,
                        amount = self.request.amount,
                        balance = account.balance(),
                        "transfer verified"
                    );
                }
                if let Err(e) = self.store.write().await.record_success() {
                    error!(session = %self.id, error = %e, "failed to persist success");
                }
                Some(self.session.outcome())
            }
            _ => None,
        }
    }
}
