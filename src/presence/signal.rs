//! Presence classification and the signals derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Where the user is, as far as input activity tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    AtComputer,
    Away,
    /// Activity seen after an absence, not yet long enough to count as back.
    Limbo,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Presence::AtComputer => "at computer",
            Presence::Away => "away from keyboard",
            Presence::Limbo => "in limbo",
        })
    }
}

/// Signals emitted by the detector.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenceSignal {
    /// The user went away; carries the time of the last input.
    Afk { last_input: Instant },
    /// The user is back; carries when the return started.
    AtComputer { since: Instant },
    EnteredLimbo,
    /// Limbo ended with the user back at the computer.
    LeftLimbo,
    /// Limbo ended without enough activity; the user is away again.
    LimboExpired,
    /// An absence reached one of the scheduled offsets (seconds).
    Scheduled { offset: f64 },
}

impl PresenceSignal {
    pub fn name(&self) -> &'static str {
        match self {
            PresenceSignal::Afk { .. } => "afk",
            PresenceSignal::AtComputer { .. } => "at_computer",
            PresenceSignal::EnteredLimbo => "entered_limbo",
            PresenceSignal::LeftLimbo => "left_limbo",
            PresenceSignal::LimboExpired => "limbo_expired",
            PresenceSignal::Scheduled { .. } => "scheduled",
        }
    }
}
