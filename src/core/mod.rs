//! Core state machine types and pure resolution logic.
//!
//! This module contains the building blocks of the engine:
//! - Identity-comparable events
//! - States with transition tables and entry/exit hooks
//! - Guards and conditional junctions
//! - The frozen graph and its target resolver
//! - A bounded transition log
//!
//! Resolution is pure: predicates are evaluated, nothing is mutated. All
//! side effects happen in the dispatcher, through state hooks.

mod event;
mod graph;
mod guard;
mod history;
mod junction;
mod state;
mod target;

pub use event::Event;
pub use graph::Graph;
pub use guard::{Guard, Predicate};
pub use history::{TransitionLog, TransitionRecord, DEFAULT_LOG_CAPACITY};
pub use junction::{Junction, JunctionId};
pub use state::{Hook, StateId, StateNode};
pub use target::{Destination, Target};
