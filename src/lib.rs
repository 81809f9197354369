//! Gentle: a guarded state machine engine, presence detection, and a break
//! reminder built from the two.
//!
//! The engine is an arena of states wired once at startup. Transitions may
//! point at a state, at a conditional junction, at a guarded target, or at
//! nothing at all (`Null`, which consumes the event). The dispatcher owns a
//! context object that hooks and predicates work against, so side effects
//! stay explicit.
//!
//! # Core Concepts
//!
//! - **Event**: identity token; two events are equal only if one is a clone
//!   of the other
//! - **Target**: where an event leads, resolved against the context
//! - **Junction**: ordered predicate branches with a default
//! - **StateMachine**: owns the current state and runs exit/entry hooks
//! - **PresenceDetector**: classifies the user as at the computer, away, or
//!   in limbo, and fires scheduled offsets during an absence
//!
//! # Example
//!
//! ```rust
//! use gentle::builder::MachineBuilder;
//! use gentle::core::{Event, Target};
//! use gentle::dispatch::Dispatch;
//!
//! #[derive(Default)]
//! struct Light {
//!     cycles: u32,
//!     broken: bool,
//! }
//!
//! let timer = Event::new("timer");
//!
//! let mut builder = MachineBuilder::<Light>::new();
//! let red = builder.state("red");
//! let green = builder.state("green");
//! let check = builder.junction("check", green);
//! builder.condition(check, |light: &Light| light.broken, red).unwrap();
//! builder.on_entry(green, |light| light.cycles += 1).unwrap();
//! builder.transition(red, &timer, Target::guarded(|l: &Light| !l.broken, check.into())).unwrap();
//! builder.transition(green, &timer, red).unwrap();
//! builder.initial(red);
//!
//! let mut machine = builder.build(Light::default()).unwrap();
//! machine.start();
//!
//! assert!(machine.process_event(&timer).is_transition());
//! assert_eq!(machine.current_name(), "green");
//!
//! machine.process_event(&timer);
//! machine.context_mut().broken = true;
//! assert_eq!(machine.process_event(&timer), Dispatch::Consumed);
//! assert_eq!(machine.context().cycles, 1);
//! ```

pub mod builder;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod presence;
pub mod reminder;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use crate::core::{Event, StateId, Target};
pub use dispatch::{Dispatch, StateMachine};
pub use error::{Error, Result};
pub use presence::{Presence, PresenceConfig, PresenceDetector, PresenceSignal};
pub use reminder::{Reminder, ReminderConfig};
