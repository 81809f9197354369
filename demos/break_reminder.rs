//! Break Reminder Service
//!
//! This example runs the full break reminder on tokio with a logging
//! display. Keyboard and mouse hooks are platform specific, so activity is
//! simulated: a background task reports input for a while, then goes quiet
//! so the AFK handling kicks in.
//!
//! Key concepts:
//! - Loading `config.toml` (defaults when missing)
//! - Feeding input pulses through an `InputSender`
//! - Rendering `Command`s through a `Display`
//!
//! Run with: RUST_LOG=info cargo run --example break_reminder [config.toml]

use gentle::reminder::{service, LogDisplay, ReminderConfig};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> gentle::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = ReminderConfig::load(&path)?;

    let handle = service::spawn(config, LogDisplay)?;
    let input = handle.input();

    tokio::spawn(async move {
        for _ in 0..120 {
            if !input.pulse() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        tracing::info!("simulated user walked away");
    });

    let _ = tokio::signal::ctrl_c().await;
    let (reminder, detector) = handle.stop().await?;
    tracing::info!(
        state = %reminder.current_state_name(),
        presence = %detector.state(),
        transitions = reminder.machine().log().len(),
        "shut down"
    );
    Ok(())
}
