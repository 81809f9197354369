//! Front end of the break reminder: feeds presence signals, user actions
//! and expired timers into the break machine.

use super::command::{Command, UserAction};
use super::config::{AfkTimeouts, ReminderConfig};
use super::context::ReminderContext;
use super::machine::{wire, BreakEvents, BreakStates};
use crate::builder::MachineBuilder;
use crate::core::{Event, StateId};
use crate::dispatch::{Dispatch, StateMachine};
use crate::presence::{PresenceConfig, PresenceSignal};
use chrono::{DateTime, Local};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Upper bound on timers fired by one tick, in case zero-length timings
/// keep re-arming each other.
const MAX_TIMERS_PER_TICK: usize = 32;

pub struct Reminder {
    machine: StateMachine<ReminderContext>,
    events: BreakEvents,
    states: BreakStates,
    afk: AfkTimeouts,
}

impl Reminder {
    /// Validate `config`, wire the machine and enter the first state.
    pub fn new(
        config: ReminderConfig,
        now: Instant,
        wall_now: DateTime<Local>,
    ) -> crate::Result<Self> {
        config.validate()?;
        let afk = config.afk_timeouts();

        let events = BreakEvents::new();
        let mut builder = MachineBuilder::new();
        let states = wire(&mut builder, &events)?;
        builder.initial(states.waiting_for_short_break);

        let mut machine = builder.build(ReminderContext::new(config, now, wall_now))?;
        info!("Welcome to the Gentle Break Reminder!");
        machine.start();

        Ok(Self {
            machine,
            events,
            states,
            afk,
        })
    }

    /// Detector settings with this reminder's AFK offsets scheduled.
    pub fn presence_config(&self) -> PresenceConfig {
        self.machine.context().config().presence_config()
    }

    /// React to a presence signal. Returns `None` for signals the break
    /// machine does not listen to.
    pub fn handle_presence(
        &mut self,
        signal: &PresenceSignal,
        now: Instant,
        wall_now: DateTime<Local>,
    ) -> Option<Dispatch> {
        let event = match signal {
            PresenceSignal::Scheduled { offset } if self.afk.short == Some(*offset) => {
                self.events.afk_short_period_ended.clone()
            }
            PresenceSignal::Scheduled { offset } if self.afk.long == Some(*offset) => {
                self.events.afk_long_period_ended.clone()
            }
            PresenceSignal::Scheduled { offset } => {
                warn!(offset, "scheduled timeout with no matching AFK period");
                return None;
            }
            PresenceSignal::AtComputer { .. } => self.events.returned_to_computer.clone(),
            other => {
                debug!(signal = other.name(), "presence signal ignored");
                return None;
            }
        };
        Some(self.dispatch(&event, now, wall_now))
    }

    /// React to input from the user interface.
    pub fn handle_user(
        &mut self,
        action: UserAction,
        now: Instant,
        wall_now: DateTime<Local>,
    ) -> Dispatch {
        let event = match action {
            UserAction::StartBreak => self.events.break_started.clone(),
            UserAction::EndBreak => self.events.break_ended.clone(),
        };
        self.dispatch(&event, now, wall_now)
    }

    /// Fire every timer due at `now`, in deadline order, and refresh the
    /// tooltip if it is live.
    pub fn tick(&mut self, now: Instant, wall_now: DateTime<Local>) -> Vec<Dispatch> {
        self.machine.context_mut().set_clock(now, wall_now);

        let mut outcomes = Vec::new();
        while let Some(timer) = self.machine.context_mut().take_due_timer() {
            if outcomes.len() == MAX_TIMERS_PER_TICK {
                warn!(?timer, "too many timers in one tick, deferring the rest");
                self.machine.context_mut().arm(timer, 0.0);
                break;
            }
            debug!(?timer, "timer expired");
            let event = self.events.for_timer(timer).clone();
            outcomes.push(self.machine.process_event(&event));
        }

        self.machine.context_mut().refresh_tooltip_if_due();
        outcomes
    }

    /// Commands queued since the last drain, oldest first.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        self.machine.context_mut().take_commands()
    }

    /// When [`tick`](Self::tick) next has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.machine.context().next_deadline()
    }

    pub fn current_state(&self) -> StateId {
        self.machine.current_state()
    }

    pub fn current_state_name(&self) -> &str {
        self.machine.current_name()
    }

    pub fn states(&self) -> &BreakStates {
        &self.states
    }

    pub fn events(&self) -> &BreakEvents {
        &self.events
    }

    pub fn context(&self) -> &ReminderContext {
        self.machine.context()
    }

    pub fn machine(&self) -> &StateMachine<ReminderContext> {
        &self.machine
    }

    fn dispatch(&mut self, event: &Event, now: Instant, wall_now: DateTime<Local>) -> Dispatch {
        self.machine.context_mut().set_clock(now, wall_now);
        self.machine.process_event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::command::{LongBreakScreen, Urgency};
    use std::time::Duration;

    struct Harness {
        reminder: Reminder,
        start: Instant,
    }

    impl Harness {
        fn new(config: ReminderConfig) -> Self {
            let start = Instant::now();
            let reminder = Reminder::new(config, start, Local::now()).unwrap();
            Self { reminder, start }
        }

        fn at(&self, secs: f64) -> Instant {
            self.start + Duration::from_secs_f64(secs)
        }

        fn tick(&mut self, secs: f64) -> Vec<Dispatch> {
            let now = self.at(secs);
            self.reminder.tick(now, Local::now())
        }

        fn user(&mut self, secs: f64, action: UserAction) -> Dispatch {
            let now = self.at(secs);
            self.reminder.handle_user(action, now, Local::now())
        }

        fn presence(&mut self, secs: f64, signal: PresenceSignal) -> Option<Dispatch> {
            let now = self.at(secs);
            self.reminder.handle_presence(&signal, now, Local::now())
        }

        fn is_in(&self, state: impl Fn(&BreakStates) -> StateId) -> bool {
            self.reminder.current_state() == state(self.reminder.states())
        }
    }

    /// 100s to the long break, short breaks of 5s at most 40s apart.
    fn quick() -> ReminderConfig {
        let mut config = ReminderConfig::default();
        config.long_break.spacing = 100.0;
        config.long_break.length = 30.0;
        config.long_break.early_notification = 10.0;
        config.short_break.max_spacing = 40.0;
        config.short_break.length = 5.0;
        config.short_break.early_notification = 5.0;
        config.away_from_keyboard.short_break_timeout = 20.0;
        config.away_from_keyboard.long_break_timeout = 60.0;
        config
    }

    #[test]
    fn starts_waiting_for_a_short_break() {
        let mut h = Harness::new(quick());

        assert!(h.is_in(|s| s.waiting_for_short_break));
        // ceil(105 / 45) = 3 segments: (100 - 10) / 3 = 30s to the break.
        let next_short = h.reminder.context().next_short_break().unwrap();
        assert_eq!(next_short, h.at(30.0));
        assert_eq!(h.reminder.next_deadline(), Some(h.at(3.0)));

        let commands = h.reminder.drain_commands();
        assert!(matches!(commands.as_slice(), [Command::SetTooltip { .. }]));
    }

    #[test]
    fn short_break_cycle() {
        let mut h = Harness::new(quick());
        h.reminder.drain_commands();

        assert!(h.tick(24.0).is_empty());
        let outcomes = h.tick(25.0);
        assert!(outcomes[0].is_transition());
        assert!(h.is_in(|s| s.showing_short_break_early));
        assert!(h.reminder.drain_commands().contains(&Command::ShowGlow {
            base_color: "deepskyblue".to_string(),
            accent_color: "white".to_string(),
            urgency: Urgency::Early { duration_secs: 5.0 },
            pulse_period_ms: 1000,
        }));

        h.tick(30.0);
        assert!(h.is_in(|s| s.showing_short_break_late));

        h.user(31.0, UserAction::StartBreak);
        assert!(h.is_in(|s| s.short_break_in_progress));
        let commands = h.reminder.drain_commands();
        assert_eq!(commands[0], Command::HideGlow);
        assert!(commands.contains(&Command::ShowShortBreak {
            length_secs: 5.0,
            skippable: true,
        }));

        // Length timer ends the break; 64s left to the long break, so
        // another short break fits.
        h.tick(36.0);
        assert!(h.is_in(|s| s.waiting_for_short_break));
        assert!(h.reminder.drain_commands().contains(&Command::HideShortBreak));
    }

    #[test]
    fn skipping_disabled_keeps_short_break_running() {
        let mut config = quick();
        config.general.allow_skipping_short_breaks = false;
        let mut h = Harness::new(config);

        h.tick(25.0);
        h.user(26.0, UserAction::StartBreak);
        assert_eq!(h.user(27.0, UserAction::EndBreak), Dispatch::Consumed);
        assert!(h.is_in(|s| s.short_break_in_progress));

        h.tick(31.0);
        assert!(h.is_in(|s| s.waiting_for_short_break));
    }

    #[test]
    fn junction_picks_long_break_when_short_does_not_fit() {
        let mut h = Harness::new(quick());

        h.tick(25.0);
        // Skip the notification at 70s: 30s left, under max spacing.
        h.user(70.0, UserAction::EndBreak);
        assert!(h.is_in(|s| s.waiting_for_long_break));
        assert_eq!(h.reminder.context().next_short_break(), None);
    }

    #[test]
    fn long_break_cycle_resets_schedule() {
        let mut h = Harness::new(quick());
        h.tick(25.0);
        h.user(70.0, UserAction::EndBreak);

        h.tick(90.0);
        assert!(h.is_in(|s| s.showing_long_break_early));
        h.tick(100.0);
        assert!(h.is_in(|s| s.showing_long_break_late));

        h.user(101.0, UserAction::StartBreak);
        assert!(h.is_in(|s| s.long_break_in_progress));
        h.reminder.drain_commands();

        h.tick(131.0);
        assert!(h.is_in(|s| s.long_break_finished));
        let commands = h.reminder.drain_commands();
        assert!(commands.contains(&Command::ShowLongBreak {
            screen: LongBreakScreen::Finished
        }));
        assert!(commands.contains(&Command::PlayChime));

        h.user(140.0, UserAction::EndBreak);
        assert!(h.is_in(|s| s.waiting_for_short_break));
        assert_eq!(h.reminder.context().next_long_break(), h.at(240.0));
    }

    #[test]
    fn afk_periods_reset_breaks() {
        let mut h = Harness::new(quick());

        h.presence(21.0, PresenceSignal::Scheduled { offset: 20.0 });
        assert!(h.is_in(|s| s.waiting_after_short_afk));

        // Break timers are ignored while away.
        h.tick(80.0);
        assert!(h.is_in(|s| s.waiting_after_short_afk));

        h.presence(61.0, PresenceSignal::Scheduled { offset: 60.0 });
        assert!(h.is_in(|s| s.waiting_after_long_afk));

        let returned = h.presence(
            90.0,
            PresenceSignal::AtComputer {
                since: h.at(90.0),
            },
        );
        assert!(returned.is_some_and(|d| d.is_transition()));
        assert!(h.is_in(|s| s.waiting_for_short_break));
        assert_eq!(h.reminder.context().next_long_break(), h.at(190.0));
    }

    #[test]
    fn long_absence_restarts_the_short_cycle() {
        let mut h = Harness::new(ReminderConfig::default());

        h.presence(300.0, PresenceSignal::Scheduled { offset: 300.0 });
        h.presence(900.0, PresenceSignal::Scheduled { offset: 900.0 });
        assert!(h.is_in(|s| s.waiting_after_long_afk));

        // The old long break is long past due by now.
        h.presence(
            3600.0,
            PresenceSignal::AtComputer {
                since: h.at(3600.0),
            },
        );
        assert_eq!(h.reminder.current_state_name(), "Waiting for a short break");

        let ctx = h.reminder.context();
        assert_eq!(ctx.next_long_break(), h.at(6600.0));
        let to_short = ctx.secs_until(ctx.next_short_break().unwrap());
        assert!(to_short > 0.0 && to_short <= 1200.0);
    }

    #[test]
    fn returning_mid_cycle_is_ignored() {
        let mut h = Harness::new(quick());

        let outcome = h.presence(
            5.0,
            PresenceSignal::AtComputer {
                since: h.at(5.0),
            },
        );
        assert_eq!(outcome, Some(Dispatch::Consumed));
        assert!(h.presence(6.0, PresenceSignal::EnteredLimbo).is_none());
        assert!(h
            .presence(7.0, PresenceSignal::Scheduled { offset: 3.0 })
            .is_none());
        assert!(h.is_in(|s| s.waiting_for_short_break));
    }

    #[test]
    fn tooltip_refreshes_while_waiting() {
        let mut h = Harness::new(quick());
        h.reminder.drain_commands();

        h.tick(2.0);
        assert!(h.reminder.drain_commands().is_empty());
        h.tick(3.0);
        assert!(matches!(
            h.reminder.drain_commands().as_slice(),
            [Command::SetTooltip { .. }]
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = quick();
        config.short_break.length = f64::NAN;

        let result = Reminder::new(config, Instant::now(), Local::now());
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn unsupported_time_format_is_rejected() {
        let mut config = ReminderConfig::default();
        config.general.time_format = "%Q".to_string();
        config.general.show_clock_times = true;

        let result = Reminder::new(config, Instant::now(), Local::now());
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}
