//! Background task driving a [`PresenceDetector`] on a tokio runtime.
//!
//! Input pulses arrive over an unbounded channel so callers on any thread
//! (input hooks, tests) can report activity without blocking. A periodic
//! interval drives the detector's tick. Signals are forwarded in the order
//! the detector produced them.

use super::detector::PresenceDetector;
use super::signal::PresenceSignal;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Cloneable handle for reporting raw input activity.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: mpsc::UnboundedSender<()>,
}

impl InputSender {
    /// Report one activity pulse. Returns `false` once the monitor stopped.
    pub fn pulse(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Owner handle of a running monitor.
///
/// Dropping the handle also stops the task.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<PresenceDetector>,
}

impl MonitorHandle {
    /// Stop the monitor and hand back the detector in its final state.
    pub async fn stop(mut self) -> Result<PresenceDetector, JoinError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        (&mut self.task).await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Start monitoring. Must be called from within a tokio runtime.
pub fn spawn(
    detector: PresenceDetector,
    interval: Duration,
) -> (
    InputSender,
    mpsc::UnboundedReceiver<PresenceSignal>,
    MonitorHandle,
) {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(run(detector, interval, input_rx, signal_tx, shutdown_rx));

    (
        InputSender { tx: input_tx },
        signal_rx,
        MonitorHandle {
            shutdown: Some(shutdown_tx),
            task,
        },
    )
}

async fn run(
    mut detector: PresenceDetector,
    period: Duration,
    mut input_rx: mpsc::UnboundedReceiver<()>,
    signal_tx: mpsc::UnboundedSender<PresenceSignal>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> PresenceDetector {
    let period = period.max(Duration::from_millis(1));
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    debug!(?period, "presence monitor started");

    loop {
        let signals = tokio::select! {
            _ = &mut shutdown_rx => break,
            Some(()) = input_rx.recv() => {
                trace!("input pulse");
                detector.notify_input(Instant::now().into_std())
            }
            _ = ticker.tick() => detector.on_tick(Instant::now().into_std()),
        };

        if !forward(&signal_tx, signals) {
            debug!("signal receiver dropped");
            break;
        }
    }

    debug!(state = %detector.state(), "presence monitor stopped");
    detector
}

fn forward(tx: &mpsc::UnboundedSender<PresenceSignal>, signals: Vec<PresenceSignal>) -> bool {
    for signal in signals {
        debug!(signal = signal.name(), "presence signal");
        if tx.send(signal).is_err() {
            return false;
        }
    }
    true
}
