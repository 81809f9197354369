//! Presence detection from raw input activity.
//!
//! [`PresenceDetector`] is pure and clock-free; [`monitor`] runs one on a
//! tokio task fed by input pulses and a periodic tick.

pub mod config;
pub mod detector;
pub mod monitor;
pub mod signal;

pub use config::PresenceConfig;
pub use detector::PresenceDetector;
pub use monitor::{InputSender, MonitorHandle};
pub use signal::{Presence, PresenceSignal};
