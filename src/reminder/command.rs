//! What the reminder asks of the outside world, and what it hears back.

use serde::{Deserialize, Serialize};
use tracing::info;

/// How insistent a notification glow is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Fades from the base color toward the accent over `duration_secs`,
    /// speeding up as the break gets closer.
    Early { duration_secs: f64 },
    /// Pulses steadily between the base and accent colors.
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongBreakScreen {
    Countdown { length_secs: f64 },
    Finished,
}

/// A request to a [`Display`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    ShowGlow {
        base_color: String,
        accent_color: String,
        urgency: Urgency,
        pulse_period_ms: u64,
    },
    HideGlow,
    ShowShortBreak {
        length_secs: f64,
        skippable: bool,
    },
    HideShortBreak,
    ShowLongBreak {
        screen: LongBreakScreen,
    },
    HideLongBreak,
    PlayChime,
    SetTooltip {
        text: String,
    },
}

/// Input from the user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// The user clicked a notification.
    StartBreak,
    /// The user finished, skipped or dismissed a break.
    EndBreak,
}

/// Renders commands: glow windows, break screens, sound, tray tooltip.
pub trait Display {
    fn apply(&mut self, command: Command);
}

/// Collects commands in order.
impl Display for Vec<Command> {
    fn apply(&mut self, command: Command) {
        self.push(command);
    }
}

/// Forwards commands to another task. A closed receiver drops them.
impl Display for tokio::sync::mpsc::UnboundedSender<Command> {
    fn apply(&mut self, command: Command) {
        let _ = self.send(command);
    }
}

/// Writes each command to the log instead of rendering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

impl Display for LogDisplay {
    fn apply(&mut self, command: Command) {
        match command {
            Command::SetTooltip { text } => info!(tooltip = %text.replace('\n', " | "), "tooltip"),
            other => info!(?other, "display"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_with_a_tag() {
        let json = serde_json::to_value(Command::ShowLongBreak {
            screen: LongBreakScreen::Finished,
        })
        .unwrap();

        assert_eq!(json["command"], "show_long_break");
        assert_eq!(json["screen"], "finished");
    }

    #[test]
    fn vec_display_records_in_order() {
        let mut shown = Vec::new();
        shown.apply(Command::PlayChime);
        shown.apply(Command::HideGlow);

        assert_eq!(shown, vec![Command::PlayChime, Command::HideGlow]);
    }
}
