//! Event dispatch around the pure core.
//!
//! This module is the imperative shell of the engine: it owns the current
//! state and runs exit/entry hooks around every transition.

mod machine;
mod outcome;

pub use machine::StateMachine;
pub use outcome::Dispatch;
