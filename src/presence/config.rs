//! Presence detector configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Tunables for [`PresenceDetector`](super::PresenceDetector).
///
/// All timeouts are in seconds. Deserialized from the `[afk_options]` table
/// of the configuration file; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Seconds without input before the user counts as away.
    #[serde(default = "default_input_timeout")]
    pub input_timeout: f64,
    /// Seconds of continued activity in limbo before the user counts as
    /// back. Zero disables limbo.
    #[serde(default = "default_limbo_timeout_to_back")]
    pub limbo_timeout_to_back: f64,
    /// Seconds without input in limbo before falling back to away.
    /// Derived from `limbo_timeout_to_back` when unset.
    #[serde(default)]
    pub limbo_timeout_to_afk: Option<f64>,
    #[serde(default = "default_limbo_timeout_to_afk_multiplier")]
    pub limbo_timeout_to_afk_multiplier: f64,
    /// Offsets into an absence at which one-shot signals fire.
    #[serde(default)]
    pub scheduled_timeouts: Vec<f64>,
    #[serde(default = "default_monitor_interval_ms")]
    pub monitor_interval_ms: u64,
    /// Measure scheduled offsets from the last input, even while in limbo.
    #[serde(default)]
    pub resets_scheduled_events_on_limbo: bool,
    /// Allow scheduled offsets earlier than `input_timeout`.
    #[serde(default)]
    pub allows_scheduled_events_before_afk: bool,
}

fn default_input_timeout() -> f64 {
    60.0
}
fn default_limbo_timeout_to_back() -> f64 {
    5.0
}
fn default_limbo_timeout_to_afk_multiplier() -> f64 {
    3.0
}
fn default_monitor_interval_ms() -> u64 {
    100
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            input_timeout: default_input_timeout(),
            limbo_timeout_to_back: default_limbo_timeout_to_back(),
            limbo_timeout_to_afk: None,
            limbo_timeout_to_afk_multiplier: default_limbo_timeout_to_afk_multiplier(),
            scheduled_timeouts: Vec::new(),
            monitor_interval_ms: default_monitor_interval_ms(),
            resets_scheduled_events_on_limbo: false,
            allows_scheduled_events_before_afk: false,
        }
    }
}

impl PresenceConfig {
    /// Replace the scheduled offsets.
    pub fn with_scheduled_timeouts(mut self, offsets: Vec<f64>) -> Self {
        self.scheduled_timeouts = offsets;
        self
    }

    pub fn uses_limbo(&self) -> bool {
        self.limbo_timeout_to_back > 0.0
    }

    /// Effective limbo-to-away timeout.
    pub fn limbo_timeout_to_afk(&self) -> f64 {
        self.limbo_timeout_to_afk
            .unwrap_or(self.limbo_timeout_to_back * self.limbo_timeout_to_afk_multiplier)
    }

    /// Tick period. A zero interval falls back to the default.
    pub fn monitor_interval(&self) -> Duration {
        if self.monitor_interval_ms == 0 {
            warn!(
                default_ms = default_monitor_interval_ms(),
                "monitor_interval_ms must be positive, using the default"
            );
            return Duration::from_millis(default_monitor_interval_ms());
        }
        Duration::from_millis(self.monitor_interval_ms)
    }
}
