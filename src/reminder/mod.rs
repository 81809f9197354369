//! Break reminder built on the state machine engine and presence detection.
//!
//! [`Reminder`] is synchronous and clock-driven: the caller passes the time
//! in and drains [`Command`]s out. [`service`] runs one on tokio together
//! with a presence monitor.

pub mod command;
pub mod config;
pub mod context;
pub mod machine;
pub mod scheduler;
pub mod service;
pub mod tooltip;

pub use command::{Command, Display, LogDisplay, LongBreakScreen, Urgency, UserAction};
pub use config::{AfkTimeouts, ConfigError, ReminderConfig};
pub use context::{ReminderContext, Timer};
pub use machine::{BreakEvents, BreakStates};
pub use scheduler::Reminder;
pub use service::ServiceHandle;
