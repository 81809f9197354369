//! Outcome of dispatching a single event.

use crate::core::StateId;

/// What `process_event` did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The current state has no entry for the event.
    Unhandled,

    /// The entry resolved to no transition (`Null` or a false guard).
    Consumed,

    /// Hooks ran and the current state is now `to` (possibly equal to `from`).
    Transitioned { from: StateId, to: StateId },
}

impl Dispatch {
    pub fn is_transition(&self) -> bool {
        matches!(self, Dispatch::Transitioned { .. })
    }
}
