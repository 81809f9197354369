//! Mutable state shared by the break machine's hooks.
//!
//! Hooks never talk to the outside world directly. They arm timers and queue
//! [`Command`]s here; the owner drains the queue and fires due timers.

use super::command::{Command, LongBreakScreen, Urgency};
use super::config::ReminderConfig;
use super::tooltip;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How often a live tooltip is refreshed.
pub const TOOLTIP_REFRESH: Duration = Duration::from_secs(3);

/// One-shot timers armed by state hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Timer {
    ShortBreakDue,
    ShortBreakEarlyNotification,
    ShortBreakLength,
    LongBreakDue,
    LongBreakEarlyNotification,
    LongBreakLength,
}

pub struct ReminderContext {
    config: ReminderConfig,
    now: Instant,
    wall_now: DateTime<Local>,
    next_long_break: Instant,
    next_short_break: Option<Instant>,
    short_break_ends_at: Option<Instant>,
    timers: HashMap<Timer, Instant>,
    tooltip_refresh_at: Option<Instant>,
    outbox: Vec<Command>,
}

impl ReminderContext {
    pub fn new(config: ReminderConfig, now: Instant, wall_now: DateTime<Local>) -> Self {
        let next_long_break = after(now, config.long_break.spacing);
        Self {
            config,
            now,
            wall_now,
            next_long_break,
            next_short_break: None,
            short_break_ends_at: None,
            timers: HashMap::new(),
            tooltip_refresh_at: None,
            outbox: Vec::new(),
        }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Advance the clocks hooks read. Time never moves backwards.
    pub fn set_clock(&mut self, now: Instant, wall_now: DateTime<Local>) {
        if now > self.now {
            self.now = now;
        }
        self.wall_now = wall_now;
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn next_long_break(&self) -> Instant {
        self.next_long_break
    }

    pub fn next_short_break(&self) -> Option<Instant> {
        self.next_short_break
    }

    pub fn timer_deadline(&self, timer: Timer) -> Option<Instant> {
        self.timers.get(&timer).copied()
    }

    /// Signed seconds from now until `at`.
    pub fn secs_until(&self, at: Instant) -> f64 {
        signed_secs(self.now, at)
    }

    pub fn secs_to_long_break(&self) -> f64 {
        self.secs_until(self.next_long_break)
    }

    /// Junction predicate: does a short break fit before the long one?
    pub fn has_short_break_before_long_break(&self) -> bool {
        let max_spacing = self.config.short_break.max_spacing;
        let to_long = self.secs_to_long_break();
        let fits = max_spacing < to_long;
        debug!(fits, max_spacing, to_long, "short break before long break");
        fits
    }

    /// Guard for ending a short break: early only when skipping is allowed.
    pub fn may_end_short_break(&self) -> bool {
        self.config.general.allow_skipping_short_breaks
            || self.short_break_ends_at.map_or(true, |end| self.now >= end)
    }

    // Timers

    pub fn arm(&mut self, timer: Timer, secs: f64) {
        let deadline = after(self.now, secs);
        debug!(?timer, secs, "timer armed");
        self.timers.insert(timer, deadline);
    }

    pub fn cancel(&mut self, timer: Timer) {
        if self.timers.remove(&timer).is_some() {
            debug!(?timer, "timer cancelled");
        }
    }

    /// Remove and return the earliest timer whose deadline has passed.
    pub fn take_due_timer(&mut self) -> Option<Timer> {
        let now = self.now;
        let (&timer, _) = self
            .timers
            .iter()
            .filter(|(_, &deadline)| deadline <= now)
            .min_by_key(|(&timer, &deadline)| (deadline, timer))?;
        self.timers.remove(&timer);
        Some(timer)
    }

    /// Earliest instant at which something is due, timers or tooltip.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers
            .values()
            .copied()
            .chain(self.tooltip_refresh_at)
            .min()
    }

    // Commands

    pub fn emit(&mut self, command: Command) {
        self.outbox.push(command);
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    /// Show the break schedule and keep it refreshed.
    pub fn show_schedule_tooltip(&mut self) {
        let short_secs = self.next_short_break.map(|at| self.secs_until(at));
        let text = tooltip::schedule_tooltip(
            &self.config.general,
            short_secs,
            self.secs_to_long_break(),
            self.wall_now,
        );
        self.emit(Command::SetTooltip { text });
        self.tooltip_refresh_at = Some(self.now + TOOLTIP_REFRESH);
    }

    /// Show a fixed status and stop refreshing.
    pub fn show_static_tooltip(&mut self, status: &str) {
        self.tooltip_refresh_at = None;
        self.emit(Command::SetTooltip {
            text: tooltip::static_tooltip(status),
        });
    }

    pub fn refresh_tooltip_if_due(&mut self) {
        if self.tooltip_refresh_at.is_some_and(|at| at <= self.now) {
            self.show_schedule_tooltip();
        }
    }

    fn clock_time(&self, at: Instant) -> String {
        tooltip::clock_time(
            &self.config.general.time_format,
            self.secs_until(at),
            self.wall_now,
        )
    }

    // State actions

    pub fn reset_next_long_break(&mut self) {
        self.next_long_break = after(self.now, self.config.long_break.spacing);
        debug!(at = %self.clock_time(self.next_long_break), "next long break reset");
    }

    /// Spread short breaks evenly over the time left before the long break
    /// and arm the timer for the next one's notification.
    pub fn schedule_short_break(&mut self) {
        let short = &self.config.short_break;
        let to_long = self.secs_to_long_break();

        let segments = ((to_long + short.length) / (short.length + short.max_spacing))
            .ceil()
            .max(1.0);
        let short_breaks = segments - 1.0;
        let working = to_long - short_breaks * short.length;
        let to_short = working / segments;
        let to_notification = (to_short - short.early_notification).max(0.0);
        debug!(to_long, segments, working, to_short, to_notification, "short break scheduled");

        self.next_short_break = Some(after(self.now, to_short));
        self.arm(Timer::ShortBreakDue, to_notification);

        info!(at = %self.clock_time(after(self.now, to_short)), "Next break (short)");
        info!(at = %self.clock_time(self.next_long_break), "Next long break");
        self.show_schedule_tooltip();
    }

    pub fn schedule_long_break(&mut self) {
        let to_long = self.secs_to_long_break();
        let to_notification = (to_long - self.config.long_break.early_notification).max(0.0);
        debug!(to_long, to_notification, "long break scheduled");

        self.next_short_break = None;
        self.arm(Timer::LongBreakDue, to_notification);

        info!(at = %self.clock_time(self.next_long_break), "Next break (long)");
        self.show_schedule_tooltip();
    }

    pub fn show_short_early_notification(&mut self) {
        let early = self.config.short_break.early_notification;
        let color = self.config.colors.short.clone();
        self.show_glow(color, Urgency::Early { duration_secs: early });
        self.arm(Timer::ShortBreakEarlyNotification, early);
    }

    pub fn show_long_early_notification(&mut self) {
        let early = self.config.long_break.early_notification;
        let color = self.config.colors.regular.clone();
        self.show_glow(color, Urgency::Early { duration_secs: early });
        self.arm(Timer::LongBreakEarlyNotification, early);
    }

    pub fn show_short_late_notification(&mut self) {
        let color = self.config.colors.short.clone();
        self.show_glow(color, Urgency::Late);
    }

    pub fn show_long_late_notification(&mut self) {
        let color = self.config.colors.regular.clone();
        self.show_glow(color, Urgency::Late);
    }

    fn show_glow(&mut self, base_color: String, urgency: Urgency) {
        let accent_color = match urgency {
            Urgency::Early { .. } => self.config.colors.early.clone(),
            Urgency::Late => self.config.colors.late.clone(),
        };
        self.emit(Command::ShowGlow {
            base_color,
            accent_color,
            urgency,
            pulse_period_ms: self.config.general.steady_pulse_period,
        });
    }

    pub fn hide_glow(&mut self) {
        self.cancel(Timer::ShortBreakEarlyNotification);
        self.cancel(Timer::LongBreakEarlyNotification);
        self.emit(Command::HideGlow);
    }

    pub fn start_short_break(&mut self) {
        let length = self.config.short_break.length;
        self.emit(Command::ShowShortBreak {
            length_secs: length,
            skippable: self.config.general.allow_skipping_short_breaks,
        });
        self.arm(Timer::ShortBreakLength, length);
        self.short_break_ends_at = Some(after(self.now, length));
        self.show_static_tooltip("Short break in progress");
        info!("Taking a short break.");
    }

    pub fn finish_short_break(&mut self) {
        self.emit(Command::HideShortBreak);
        self.cancel(Timer::ShortBreakLength);
        self.short_break_ends_at = None;
        info!("Short break finished.");
    }

    pub fn start_long_break(&mut self) {
        let length = self.config.long_break.length;
        self.emit(Command::ShowLongBreak {
            screen: LongBreakScreen::Countdown {
                length_secs: length,
            },
        });
        self.arm(Timer::LongBreakLength, length);
        self.show_static_tooltip("Long break in progress");
        info!("Taking a long break.");
    }

    pub fn leave_long_break(&mut self) {
        self.cancel(Timer::LongBreakLength);
        self.emit(Command::HideLongBreak);
        self.reset_next_long_break();
    }

    pub fn show_long_break_finished(&mut self) {
        self.emit(Command::ShowLongBreak {
            screen: LongBreakScreen::Finished,
        });
        self.emit(Command::PlayChime);
        self.show_static_tooltip("Long break finished");
    }
}

/// `now + secs`, treating negative or unrepresentable offsets as zero.
fn after(now: Instant, secs: f64) -> Instant {
    Duration::try_from_secs_f64(secs.max(0.0))
        .ok()
        .and_then(|offset| now.checked_add(offset))
        .unwrap_or(now)
}

fn signed_secs(from: Instant, to: Instant) -> f64 {
    if to >= from {
        (to - from).as_secs_f64()
    } else {
        -(from - to).as_secs_f64()
    }
}
