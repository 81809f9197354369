//! Activity-based presence detection.
//!
//! The detector is a plain state machine over three occupancy states. It
//! never reads a clock itself: every call takes the current instant, and
//! every call returns the signals it raised, in order.
//!
//! ```text
//! AtComputer --(idle > input_timeout)--> Away
//! Away --(input)--> Limbo
//! Limbo --(input, > limbo_timeout_to_back after entering)--> AtComputer
//! Limbo --(idle > limbo_timeout_to_afk)--> Away
//! ```
//!
//! Without limbo (`limbo_timeout_to_back == 0`), any input while away goes
//! straight back to `AtComputer`.

use super::config::PresenceConfig;
use super::signal::{Presence, PresenceSignal};
use std::time::Instant;
use tracing::{debug, warn};

/// Classifies presence from activity pulses and periodic ticks.
#[derive(Debug, Clone)]
pub struct PresenceDetector {
    input_timeout: f64,
    limbo_timeout_to_back: f64,
    limbo_timeout_to_afk: f64,
    scheduled: Vec<f64>,
    cursor: usize,
    resets_scheduled_events_on_limbo: bool,
    uses_limbo: bool,
    monitors_timeouts: bool,
    state: Presence,
    last_input: Instant,
    entered_limbo: Instant,
    last_input_before_away: Instant,
}

impl PresenceDetector {
    /// Create a detector that considers the user present as of `now`.
    ///
    /// If the earliest scheduled offset comes before `input_timeout` and
    /// early scheduled events are not allowed, `input_timeout` is lowered to
    /// that offset so scheduled signals never precede going away.
    pub fn new(config: &PresenceConfig, now: Instant) -> Self {
        let mut scheduled = config.scheduled_timeouts.clone();
        scheduled.sort_by(f64::total_cmp);
        scheduled.dedup();

        let mut input_timeout = config.input_timeout;
        if let Some(&earliest) = scheduled.first() {
            if earliest < input_timeout && !config.allows_scheduled_events_before_afk {
                warn!(
                    input_timeout,
                    earliest,
                    "input timeout is longer than the earliest scheduled timeout, lowering it"
                );
                input_timeout = earliest;
            }
        }

        let monitors_timeouts = input_timeout > 0.0 || !scheduled.is_empty();
        if monitors_timeouts && input_timeout <= 0.0 {
            warn!(input_timeout, "non-positive input timeout: every idle tick counts as away");
        }

        Self {
            input_timeout,
            limbo_timeout_to_back: config.limbo_timeout_to_back,
            limbo_timeout_to_afk: config.limbo_timeout_to_afk(),
            scheduled,
            cursor: 0,
            resets_scheduled_events_on_limbo: config.resets_scheduled_events_on_limbo,
            uses_limbo: config.uses_limbo(),
            monitors_timeouts,
            state: Presence::AtComputer,
            last_input: now,
            entered_limbo: now,
            last_input_before_away: now,
        }
    }

    /// Handle one raw activity pulse.
    pub fn notify_input(&mut self, now: Instant) -> Vec<PresenceSignal> {
        self.last_input = now;

        if !self.monitors_timeouts {
            return vec![PresenceSignal::AtComputer { since: now }];
        }

        let mut signals = Vec::new();
        match self.state {
            Presence::Away if self.uses_limbo => {
                self.set_state(Presence::Limbo);
                self.entered_limbo = now;
                signals.push(PresenceSignal::EnteredLimbo);
            }
            Presence::Limbo if seconds_between(self.entered_limbo, now) > self.limbo_timeout_to_back => {
                self.set_state(Presence::AtComputer);
                self.cursor = 0;
                signals.push(PresenceSignal::LeftLimbo);
                signals.push(PresenceSignal::AtComputer {
                    since: self.entered_limbo,
                });
            }
            Presence::Away => {
                self.set_state(Presence::AtComputer);
                self.cursor = 0;
                signals.push(PresenceSignal::AtComputer { since: now });
            }
            Presence::Limbo | Presence::AtComputer => {}
        }
        signals
    }

    /// Handle one periodic tick.
    pub fn on_tick(&mut self, now: Instant) -> Vec<PresenceSignal> {
        let elapsed = seconds_between(self.last_input, now);
        let mut signals = Vec::new();

        if self.state == Presence::Limbo && elapsed > self.limbo_timeout_to_afk {
            self.set_state(Presence::Away);
            signals.push(PresenceSignal::LimboExpired);
        } else if self.state == Presence::AtComputer
            && self.monitors_timeouts
            && elapsed > self.input_timeout
        {
            self.set_state(Presence::Away);
            self.last_input_before_away = self.last_input;
            signals.push(PresenceSignal::Afk {
                last_input: self.last_input,
            });
        }

        let anchored = matches!(self.state, Presence::Away | Presence::Limbo)
            && !self.resets_scheduled_events_on_limbo;
        let basis = if anchored {
            seconds_between(self.last_input_before_away, now)
        } else {
            elapsed
        };

        while let Some(&offset) = self.scheduled.get(self.cursor) {
            if basis <= offset {
                break;
            }
            debug!(offset, "scheduled timeout reached");
            signals.push(PresenceSignal::Scheduled { offset });
            self.cursor += 1;
        }

        signals
    }

    pub fn state(&self) -> Presence {
        self.state
    }

    /// Effective input timeout, after clamping to the scheduled offsets.
    pub fn input_timeout(&self) -> f64 {
        self.input_timeout
    }

    pub fn limbo_timeout_to_afk(&self) -> f64 {
        self.limbo_timeout_to_afk
    }

    pub fn scheduled_timeouts(&self) -> &[f64] {
        &self.scheduled
    }

    /// The next offset that will fire during the current absence.
    pub fn next_scheduled(&self) -> Option<f64> {
        self.scheduled.get(self.cursor).copied()
    }

    pub fn uses_limbo(&self) -> bool {
        self.uses_limbo
    }

    pub fn monitors_timeouts(&self) -> bool {
        self.monitors_timeouts
    }

    pub fn last_input(&self) -> Instant {
        self.last_input
    }

    fn set_state(&mut self, state: Presence) {
        debug!(from = %self.state, to = %state, "presence changed");
        self.state = state;
    }
}

fn seconds_between(earlier: Instant, later: Instant) -> f64 {
    later.saturating_duration_since(earlier).as_secs_f64()
}
