//! Tray tooltip text.

use super::config::GeneralConfig;
use chrono::{DateTime, Local, TimeDelta};
use std::fmt::Write;

pub const TOOLTIP_TITLE: &str = "Gentle Break Reminder";

/// Describe a due time `secs` from now, rounded to the nearest minute.
///
/// ```
/// use gentle::reminder::tooltip::relative_due_time;
///
/// assert_eq!(relative_due_time(10.0), "Due right now");
/// assert_eq!(relative_due_time(95.0), "In about 2 minutes");
/// assert_eq!(relative_due_time(-65.0), "Past due by about 1 minute");
/// ```
pub fn relative_due_time(secs: f64) -> String {
    let closest_minute = ((secs + 30.0) / 60.0).floor() as i64;
    match closest_minute {
        0 => "Due right now".to_string(),
        -1 => "Past due by about 1 minute".to_string(),
        1 => "In about 1 minute".to_string(),
        m if m < -1 => format!("Past due by about {} minutes", -m),
        m => format!("In about {m} minutes"),
    }
}

/// Lines describing one upcoming break, or none if both time styles are off.
fn break_lines(general: &GeneralConfig, secs: f64, wall_now: DateTime<Local>) -> Vec<String> {
    let relative = general
        .show_relative_times
        .then(|| relative_due_time(secs));
    let clock = general
        .show_clock_times
        .then(|| clock_time(&general.time_format, secs, wall_now));

    match (relative, clock) {
        (Some(relative), Some(clock)) => vec![relative, format!("({clock})")],
        (Some(line), None) | (None, Some(line)) => vec![line],
        (None, None) => Vec::new(),
    }
}

/// Wall-clock time `secs` from `wall_now`, in `time_format`.
///
/// Falls back to `"?"` when the time is out of range or the format is bad.
pub fn clock_time(time_format: &str, secs: f64, wall_now: DateTime<Local>) -> String {
    let Some(at) = TimeDelta::try_milliseconds((secs * 1000.0) as i64)
        .and_then(|offset| wall_now.checked_add_signed(offset))
    else {
        return "?".to_string();
    };

    let mut text = String::new();
    if write!(text, "{}", at.format(time_format)).is_err() {
        return "?".to_string();
    }
    text
}

/// Tooltip listing the next breaks.
///
/// `short_secs` is `None` when the next break is the long one.
pub fn schedule_tooltip(
    general: &GeneralConfig,
    short_secs: Option<f64>,
    long_secs: f64,
    wall_now: DateTime<Local>,
) -> String {
    if !(general.show_clock_times || general.show_relative_times) {
        return TOOLTIP_TITLE.to_string();
    }

    let mut lines = vec![TOOLTIP_TITLE.to_string()];
    match short_secs {
        Some(short_secs) => {
            lines.push("Next break (short):".to_string());
            lines.extend(break_lines(general, short_secs, wall_now));
            lines.push("Next long break:".to_string());
        }
        None => lines.push("Next break (long):".to_string()),
    }
    lines.extend(break_lines(general, long_secs, wall_now));
    lines.join("\n")
}

/// Tooltip with a fixed status line.
pub fn static_tooltip(text: &str) -> String {
    format!("{TOOLTIP_TITLE}\n{text}")
}
