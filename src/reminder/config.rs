//! Break reminder configuration, loaded from a TOML file.
//!
//! Every table and every field is optional; anything missing falls back to
//! the defaults below.

use crate::presence::PresenceConfig;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

/// Longest accepted duration, in seconds.
pub const MAX_DURATION_SECS: f64 = 7.0 * 24.0 * 60.0 * 60.0;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub general: GeneralConfig,
    pub long_break: LongBreakConfig,
    pub short_break: ShortBreakConfig,
    pub colors: ColorConfig,
    pub away_from_keyboard: AwayFromKeyboardConfig,
    pub afk_options: PresenceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Full period of the late-notification pulse, in milliseconds.
    #[serde(default = "default_steady_pulse_period")]
    pub steady_pulse_period: u64,
    #[serde(default = "default_true")]
    pub allow_skipping_short_breaks: bool,
    /// `strftime`-style format for clock times.
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_true")]
    pub show_relative_times: bool,
    #[serde(default)]
    pub show_clock_times: bool,
}

/// Long break timing, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongBreakConfig {
    #[serde(default = "default_long_spacing")]
    pub spacing: f64,
    #[serde(default = "default_long_length")]
    pub length: f64,
    #[serde(default = "default_long_early_notification")]
    pub early_notification: f64,
}

/// Short break timing, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortBreakConfig {
    #[serde(default = "default_short_max_spacing")]
    pub max_spacing: f64,
    #[serde(default = "default_short_length")]
    pub length: f64,
    #[serde(default = "default_short_early_notification")]
    pub early_notification: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_regular_color")]
    pub regular: String,
    #[serde(default = "default_short_color")]
    pub short: String,
    #[serde(default = "default_early_color")]
    pub early: String,
    #[serde(default = "default_late_color")]
    pub late: String,
}

/// How long an absence must last to count as a break, in seconds.
/// Zero disables the corresponding reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwayFromKeyboardConfig {
    #[serde(default = "default_afk_short")]
    pub short_break_timeout: f64,
    #[serde(default = "default_afk_long")]
    pub long_break_timeout: f64,
}

fn default_true() -> bool {
    true
}
fn default_steady_pulse_period() -> u64 {
    1_000
}
fn default_time_format() -> String {
    "%-I:%M:%S %p".to_string()
}
fn default_long_spacing() -> f64 {
    50.0 * 60.0
}
fn default_long_length() -> f64 {
    10.0 * 60.0
}
fn default_long_early_notification() -> f64 {
    2.0 * 60.0
}
fn default_short_max_spacing() -> f64 {
    20.0 * 60.0
}
fn default_short_length() -> f64 {
    20.0
}
fn default_short_early_notification() -> f64 {
    30.0
}
fn default_regular_color() -> String {
    "orchid".to_string()
}
fn default_short_color() -> String {
    "deepskyblue".to_string()
}
fn default_early_color() -> String {
    "white".to_string()
}
fn default_late_color() -> String {
    "yellow".to_string()
}
fn default_afk_short() -> f64 {
    5.0 * 60.0
}
fn default_afk_long() -> f64 {
    15.0 * 60.0
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            steady_pulse_period: default_steady_pulse_period(),
            allow_skipping_short_breaks: true,
            time_format: default_time_format(),
            show_relative_times: true,
            show_clock_times: false,
        }
    }
}

impl Default for LongBreakConfig {
    fn default() -> Self {
        Self {
            spacing: default_long_spacing(),
            length: default_long_length(),
            early_notification: default_long_early_notification(),
        }
    }
}

impl Default for ShortBreakConfig {
    fn default() -> Self {
        Self {
            max_spacing: default_short_max_spacing(),
            length: default_short_length(),
            early_notification: default_short_early_notification(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            regular: default_regular_color(),
            short: default_short_color(),
            early: default_early_color(),
            late: default_late_color(),
        }
    }
}

impl Default for AwayFromKeyboardConfig {
    fn default() -> Self {
        Self {
            short_break_timeout: default_afk_short(),
            long_break_timeout: default_afk_long(),
        }
    }
}

/// Absence offsets that reset the break schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AfkTimeouts {
    pub short: Option<f64>,
    pub long: Option<f64>,
}

impl AfkTimeouts {
    /// Offsets to schedule on the presence detector.
    pub fn offsets(&self) -> Vec<f64> {
        self.short.into_iter().chain(self.long).collect()
    }
}

impl ReminderConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "configuration file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?config, "configuration loaded");
        config.validate()?;
        Ok(config)
    }

    /// Reject timings the scheduler cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("long_break.spacing", self.long_break.spacing),
            ("long_break.length", self.long_break.length),
            ("long_break.early_notification", self.long_break.early_notification),
            ("short_break.max_spacing", self.short_break.max_spacing),
            ("short_break.length", self.short_break.length),
            ("short_break.early_notification", self.short_break.early_notification),
            ("away_from_keyboard.short_break_timeout", self.away_from_keyboard.short_break_timeout),
            ("away_from_keyboard.long_break_timeout", self.away_from_keyboard.long_break_timeout),
        ];
        for (field, value) in durations {
            if !(0.0..=MAX_DURATION_SECS).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!(
                        "expected between 0 and {MAX_DURATION_SECS} seconds, got {value}"
                    ),
                });
            }
        }

        if StrftimeItems::new(&self.general.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid {
                field: "general.time_format",
                reason: format!("unsupported format {:?}", self.general.time_format),
            });
        }

        if self.short_break.length + self.short_break.max_spacing <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "short_break",
                reason: "length and max_spacing cannot both be zero".to_string(),
            });
        }
        Ok(())
    }

    /// The absence offsets to watch for.
    ///
    /// A short timeout that is not shorter than the long one is dropped,
    /// and zero disables either.
    pub fn afk_timeouts(&self) -> AfkTimeouts {
        let short = self.away_from_keyboard.short_break_timeout;
        let long = self.away_from_keyboard.long_break_timeout;

        let short = if short >= long {
            error!(
                short,
                long,
                "short break AFK timeout is not shorter than the long one, ignoring it"
            );
            None
        } else {
            (short > 0.0).then_some(short)
        };

        AfkTimeouts {
            short,
            long: (long > 0.0).then_some(long),
        }
    }

    /// Detector settings with the AFK offsets scheduled.
    pub fn presence_config(&self) -> PresenceConfig {
        self.afk_options
            .clone()
            .with_scheduled_timeouts(self.afk_timeouts().offsets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_is_all_defaults() {
        let config: ReminderConfig = toml::from_str("").unwrap();
        assert_eq!(config, ReminderConfig::default());
        assert_eq!(config.long_break.spacing, 3000.0);
        assert_eq!(config.short_break.max_spacing, 1200.0);
        assert_eq!(config.colors.short, "deepskyblue");
        assert!(config.general.allow_skipping_short_breaks);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config: ReminderConfig = toml::from_str(
            r#"
            [short_break]
            length = 45

            [general]
            show_clock_times = true

            [afk_options]
            limbo_timeout_to_back = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.short_break.length, 45.0);
        assert_eq!(config.short_break.early_notification, 30.0);
        assert!(config.general.show_clock_times);
        assert!(config.general.show_relative_times);
        assert_eq!(config.afk_options.limbo_timeout_to_back, 2.5);
        assert_eq!(config.afk_options.input_timeout, 60.0);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = ReminderConfig::load("/nonexistent/gentle/config.toml").unwrap();
        assert_eq!(config, ReminderConfig::default());
    }

    #[test]
    fn negative_duration_is_rejected() {
        let mut config = ReminderConfig::default();
        config.long_break.length = -1.0;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "long_break.length",
                ..
            }
        ));
    }

    #[test]
    fn oversized_duration_is_rejected() {
        let mut config = ReminderConfig::default();
        config.long_break.spacing = 1e13;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "long_break.spacing",
                ..
            }
        ));

        config.long_break.spacing = MAX_DURATION_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_time_format_is_rejected() {
        let mut config = ReminderConfig::default();
        config.general.time_format = "%Q".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "general.time_format",
                ..
            }
        ));

        config.general.time_format = "%H:%M".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[long_break]\nspacing = 1800\n\n[away_from_keyboard]\nshort_break_timeout = 120\n",
        )
        .unwrap();

        let config = ReminderConfig::load(&path).unwrap();
        assert_eq!(config.long_break.spacing, 1800.0);
        assert_eq!(config.away_from_keyboard.short_break_timeout, 120.0);
        assert_eq!(config.short_break, ShortBreakConfig::default());
    }

    #[test]
    fn load_reports_parse_and_validation_errors() {
        let temp_dir = TempDir::new().unwrap();

        let malformed = temp_dir.path().join("malformed.toml");
        std::fs::write(&malformed, "[long_break\nspacing = ").unwrap();
        let err = ReminderConfig::load(&malformed).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if *path == malformed));

        let wrong_type = temp_dir.path().join("wrong_type.toml");
        std::fs::write(&wrong_type, "[short_break]\nlength = \"long\"\n").unwrap();
        assert!(matches!(
            ReminderConfig::load(&wrong_type),
            Err(ConfigError::Parse { .. })
        ));

        let invalid = temp_dir.path().join("invalid.toml");
        std::fs::write(&invalid, "[general]\ntime_format = \"%Q\"\n").unwrap();
        assert!(matches!(
            ReminderConfig::load(&invalid),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn afk_timeouts_become_offsets() {
        let config = ReminderConfig::default();
        assert_eq!(config.afk_timeouts().offsets(), vec![300.0, 900.0]);
        assert_eq!(
            config.presence_config().scheduled_timeouts,
            vec![300.0, 900.0]
        );
    }

    #[test]
    fn short_timeout_not_below_long_is_dropped() {
        let mut config = ReminderConfig::default();
        config.away_from_keyboard.short_break_timeout = 900.0;

        let timeouts = config.afk_timeouts();
        assert_eq!(timeouts.short, None);
        assert_eq!(timeouts.long, Some(900.0));
    }

    #[test]
    fn zero_timeouts_are_not_scheduled() {
        let mut config = ReminderConfig::default();
        config.away_from_keyboard.short_break_timeout = 0.0;
        config.away_from_keyboard.long_break_timeout = 0.0;

        assert!(config.afk_timeouts().offsets().is_empty());
    }
}
