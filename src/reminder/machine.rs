//! The break reminder's state graph.
//!
//! Two cycles share one junction. The short cycle waits, notifies early,
//! then late, runs the break and returns to the junction; the long cycle
//! does the same for the long break plus a "finished" screen. Long enough
//! absences jump to the matching "waiting after AFK" state, and coming back
//! re-enters the junction.

use super::context::{ReminderContext, Timer};
use crate::builder::{BuildError, MachineBuilder};
use crate::core::{Event, JunctionId, StateId, Target};
use crate::transitions;
use tracing::info;

/// Every event the break machine reacts to.
#[derive(Debug, Clone)]
pub struct BreakEvents {
    pub short_break_due: Event,
    pub short_break_early_notification_ended: Event,
    pub long_break_due: Event,
    pub long_break_early_notification_ended: Event,
    pub long_break_finished: Event,
    pub break_started: Event,
    pub break_ended: Event,
    pub afk_short_period_ended: Event,
    pub afk_long_period_ended: Event,
    pub returned_to_computer: Event,
}

impl BreakEvents {
    pub fn new() -> Self {
        Self {
            short_break_due: Event::new("Short break due timeout"),
            short_break_early_notification_ended: Event::new(
                "Short break early notification timeout",
            ),
            long_break_due: Event::new("Long break due timeout"),
            long_break_early_notification_ended: Event::new(
                "Long break early notification timeout",
            ),
            long_break_finished: Event::new("Long break finished"),
            break_started: Event::new("Break started"),
            break_ended: Event::new("Break ended"),
            afk_short_period_ended: Event::new("Short AFK period ended"),
            afk_long_period_ended: Event::new("Long AFK period ended"),
            returned_to_computer: Event::new("User returned to computer"),
        }
    }

    /// The event a timer raises when it expires.
    pub fn for_timer(&self, timer: Timer) -> &Event {
        match timer {
            Timer::ShortBreakDue => &self.short_break_due,
            Timer::ShortBreakEarlyNotification => &self.short_break_early_notification_ended,
            Timer::ShortBreakLength => &self.break_ended,
            Timer::LongBreakDue => &self.long_break_due,
            Timer::LongBreakEarlyNotification => &self.long_break_early_notification_ended,
            Timer::LongBreakLength => &self.long_break_finished,
        }
    }
}

impl Default for BreakEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids of the break machine's states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakStates {
    pub waiting_for_short_break: StateId,
    pub showing_short_break_early: StateId,
    pub showing_short_break_late: StateId,
    pub short_break_in_progress: StateId,
    pub waiting_after_short_afk: StateId,
    pub waiting_for_long_break: StateId,
    pub showing_long_break_early: StateId,
    pub showing_long_break_late: StateId,
    pub long_break_in_progress: StateId,
    pub long_break_finished: StateId,
    pub waiting_after_long_afk: StateId,
    pub next_break: JunctionId,
}

/// Allocate the states, attach their hooks and fill in the transition
/// tables. The initial state is left to the caller.
pub fn wire(
    builder: &mut MachineBuilder<ReminderContext>,
    events: &BreakEvents,
) -> Result<BreakStates, BuildError> {
    let waiting_for_short_break = builder.state("Waiting for a short break");
    let showing_short_break_early = builder.state("Showing the short break early notification");
    let showing_short_break_late = builder.state("Showing the short break late notification");
    let short_break_in_progress = builder.state("Short break in progress");
    let waiting_after_short_afk = builder.state("Waiting after a short AFK timeout");

    let waiting_for_long_break = builder.state("Waiting for a long break");
    let showing_long_break_early = builder.state("Showing the long break early notification");
    let showing_long_break_late = builder.state("Showing the long break late notification");
    let long_break_in_progress = builder.state("Long break in progress");
    let long_break_finished = builder.state("Long break finished");
    let waiting_after_long_afk = builder.state("Waiting after a long AFK timeout");

    let next_break = builder.junction("Testing for next break", waiting_for_long_break);
    builder.condition(
        next_break,
        ReminderContext::has_short_break_before_long_break,
        waiting_for_short_break,
    )?;

    // Hooks
    builder
        .on_entry(waiting_for_short_break, ReminderContext::schedule_short_break)?
        .on_exit(waiting_for_short_break, |ctx| ctx.cancel(Timer::ShortBreakDue))?
        .on_entry(showing_short_break_early, ReminderContext::show_short_early_notification)?
        .on_exit(showing_short_break_early, ReminderContext::hide_glow)?
        .on_entry(showing_short_break_late, ReminderContext::show_short_late_notification)?
        .on_exit(showing_short_break_late, ReminderContext::hide_glow)?
        .on_entry(short_break_in_progress, ReminderContext::start_short_break)?
        .on_exit(short_break_in_progress, ReminderContext::finish_short_break)?
        .on_entry(waiting_after_short_afk, |ctx| {
            ctx.show_static_tooltip("Away from keyboard (short)");
            info!("Away from the computer enough to reset the short break.");
        })?;

    builder
        .on_entry(waiting_for_long_break, ReminderContext::schedule_long_break)?
        .on_exit(waiting_for_long_break, |ctx| ctx.cancel(Timer::LongBreakDue))?
        .on_entry(showing_long_break_early, ReminderContext::show_long_early_notification)?
        .on_exit(showing_long_break_early, ReminderContext::hide_glow)?
        .on_entry(showing_long_break_late, ReminderContext::show_long_late_notification)?
        .on_exit(showing_long_break_late, ReminderContext::hide_glow)?
        .on_entry(long_break_in_progress, ReminderContext::start_long_break)?
        .on_exit(long_break_in_progress, ReminderContext::leave_long_break)?
        .on_entry(long_break_finished, ReminderContext::show_long_break_finished)?
        .on_exit(long_break_finished, |ctx| {
            ctx.leave_long_break();
            info!("Getting back to work!");
        })?
        .on_entry(waiting_after_long_afk, |ctx| {
            ctx.show_static_tooltip("Away from keyboard (long)");
            info!("Away from the computer enough to reset the long break.");
        })?
        .on_exit(waiting_after_long_afk, |ctx| {
            ctx.reset_next_long_break();
            info!("Back at the computer.");
        })?;

    // Short break cycle
    transitions!(builder, waiting_for_short_break => {
        events.short_break_due => showing_short_break_early,
        events.afk_short_period_ended => waiting_after_short_afk,
        events.afk_long_period_ended => waiting_after_long_afk,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, showing_short_break_early => {
        events.short_break_early_notification_ended => showing_short_break_late,
        events.break_started => short_break_in_progress,
        events.break_ended => next_break,
        events.afk_short_period_ended => waiting_after_short_afk,
        events.afk_long_period_ended => waiting_after_long_afk,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, showing_short_break_late => {
        events.break_started => short_break_in_progress,
        events.break_ended => next_break,
        events.afk_short_period_ended => waiting_after_short_afk,
        events.afk_long_period_ended => waiting_after_long_afk,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, short_break_in_progress => {
        events.break_ended => Target::guarded(
            ReminderContext::may_end_short_break,
            Target::from(next_break),
        ),
        events.afk_short_period_ended => Target::Null,
        events.afk_long_period_ended => Target::Null,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, waiting_after_short_afk => {
        events.short_break_due => Target::Null,
        events.long_break_due => Target::Null,
        events.afk_long_period_ended => waiting_after_long_afk,
        events.returned_to_computer => next_break,
    });

    // Long break cycle
    transitions!(builder, waiting_for_long_break => {
        events.long_break_due => showing_long_break_early,
        events.afk_short_period_ended => Target::Null,
        events.afk_long_period_ended => waiting_after_long_afk,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, showing_long_break_early => {
        events.long_break_early_notification_ended => showing_long_break_late,
        events.break_started => long_break_in_progress,
        events.break_ended => next_break,
        events.afk_short_period_ended => Target::Null,
        events.afk_long_period_ended => waiting_after_long_afk,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, showing_long_break_late => {
        events.break_started => long_break_in_progress,
        events.break_ended => next_break,
        events.afk_short_period_ended => Target::Null,
        events.afk_long_period_ended => waiting_after_long_afk,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, long_break_in_progress => {
        events.long_break_finished => long_break_finished,
        events.break_ended => next_break,
        events.afk_short_period_ended => Target::Null,
        events.afk_long_period_ended => Target::Null,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, long_break_finished => {
        events.break_ended => next_break,
        events.afk_short_period_ended => Target::Null,
        events.afk_long_period_ended => Target::Null,
        events.returned_to_computer => Target::Null,
    });
    transitions!(builder, waiting_after_long_afk => {
        events.short_break_due => Target::Null,
        events.long_break_due => Target::Null,
        events.returned_to_computer => next_break,
    });

    Ok(BreakStates {
        waiting_for_short_break,
        showing_short_break_early,
        showing_short_break_late,
        short_break_in_progress,
        waiting_after_short_afk,
        waiting_for_long_break,
        showing_long_break_early,
        showing_long_break_late,
        long_break_in_progress,
        long_break_finished,
        waiting_after_long_afk,
        next_break,
    })
}
