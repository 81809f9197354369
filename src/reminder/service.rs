//! Tokio runtime for the break reminder.
//!
//! One task owns the [`Reminder`]. It sleeps until the next timer or
//! tooltip refresh, and wakes early for presence signals, user actions or
//! shutdown. Every command the reminder queues is handed to the
//! [`Display`] before the task waits again.

use super::command::{Display, UserAction};
use super::config::ReminderConfig;
use super::scheduler::Reminder;
use crate::presence::{monitor, InputSender, PresenceDetector, PresenceSignal};
use chrono::Local;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// How long to sleep when nothing is scheduled.
const IDLE_WAKEUP: Duration = Duration::from_secs(60);

/// Handle to a running break reminder.
pub struct ServiceHandle {
    input: InputSender,
    actions: mpsc::UnboundedSender<UserAction>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<crate::Result<(Reminder, PresenceDetector)>>,
}

impl ServiceHandle {
    /// Sender for raw input pulses, for the OS input hook.
    pub fn input(&self) -> InputSender {
        self.input.clone()
    }

    /// Forward a user action. Returns `false` once the service stopped.
    pub fn send(&self, action: UserAction) -> bool {
        self.actions.send(action).is_ok()
    }

    /// Stop the service and its presence monitor.
    pub async fn stop(mut self) -> crate::Result<(Reminder, PresenceDetector)> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        (&mut self.task).await?
    }
}

/// Start the reminder and its presence monitor on the current runtime.
pub fn spawn<D>(config: ReminderConfig, mut display: D) -> crate::Result<ServiceHandle>
where
    D: Display + Send + 'static,
{
    let now = Instant::now().into_std();
    let mut reminder = Reminder::new(config, now, Local::now())?;
    let presence = reminder.presence_config();
    let detector = PresenceDetector::new(&presence, now);
    let (input, signals, monitor) = monitor::spawn(detector, presence.monitor_interval());

    for command in reminder.drain_commands() {
        display.apply(command);
    }

    let (actions_tx, actions_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let reminder = run(reminder, display, signals, actions_rx, shutdown_rx).await;
        let detector = monitor.stop().await?;
        Ok::<_, crate::Error>((reminder, detector))
    });

    Ok(ServiceHandle {
        input,
        actions: actions_tx,
        shutdown: Some(shutdown_tx),
        task,
    })
}

async fn run<D: Display>(
    mut reminder: Reminder,
    mut display: D,
    mut signals: mpsc::UnboundedReceiver<PresenceSignal>,
    mut actions: mpsc::UnboundedReceiver<UserAction>,
    mut shutdown: oneshot::Receiver<()>,
) -> Reminder {
    info!(state = %reminder.current_state_name(), "break reminder running");

    loop {
        let wake_at = reminder
            .next_deadline()
            .map(Instant::from_std)
            .unwrap_or_else(|| Instant::now() + IDLE_WAKEUP);

        tokio::select! {
            _ = &mut shutdown => break,
            signal = signals.recv() => match signal {
                Some(signal) => {
                    reminder.handle_presence(&signal, Instant::now().into_std(), Local::now());
                }
                None => {
                    warn!("presence monitor stopped unexpectedly");
                    break;
                }
            },
            Some(action) = actions.recv() => {
                debug!(?action, "user action");
                reminder.handle_user(action, Instant::now().into_std(), Local::now());
            }
            _ = time::sleep_until(wake_at) => {
                reminder.tick(Instant::now().into_std(), Local::now());
            }
        }

        for command in reminder.drain_commands() {
            display.apply(command);
        }
    }

    info!(state = %reminder.current_state_name(), "break reminder stopped");
    reminder
}
