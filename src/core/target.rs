//! Raw transition targets and the destinations they resolve through.

use super::guard::Guard;
use super::junction::JunctionId;
use super::state::StateId;

/// Something that can stand where a state is expected: either a concrete
/// state or a conditional junction that resolves to one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    State(StateId),
    Junction(JunctionId),
}

impl From<StateId> for Destination {
    fn from(id: StateId) -> Self {
        Destination::State(id)
    }
}

impl From<JunctionId> for Destination {
    fn from(id: JunctionId) -> Self {
        Destination::Junction(id)
    }
}

/// The raw value stored in a state's transition table.
///
/// `Null` consumes the event without transitioning and without running any
/// hooks.
pub enum Target<C> {
    State(StateId),
    Junction(JunctionId),
    Guarded(Guard<C>),
    Null,
}

impl<C> Target<C> {
    /// Wrap a target behind a guard predicate.
    pub fn guarded<F>(predicate: F, target: Target<C>) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Target::Guarded(Guard::new(predicate, target))
    }
}

impl<C> std::fmt::Debug for Target<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::State(id) => f.debug_tuple("State").field(id).finish(),
            Target::Junction(id) => f.debug_tuple("Junction").field(id).finish(),
            Target::Guarded(guard) => guard.fmt(f),
            Target::Null => f.write_str("Null"),
        }
    }
}

impl<C> From<StateId> for Target<C> {
    fn from(id: StateId) -> Self {
        Target::State(id)
    }
}

impl<C> From<JunctionId> for Target<C> {
    fn from(id: JunctionId) -> Self {
        Target::Junction(id)
    }
}

impl<C> From<Destination> for Target<C> {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::State(id) => Target::State(id),
            Destination::Junction(id) => Target::Junction(id),
        }
    }
}
