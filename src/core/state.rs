//! Named states with transition tables and entry/exit hooks.
//!
//! States live in an arena owned by the machine graph and refer to each
//! other through [`StateId`], so cyclic transition graphs need no shared
//! ownership.

use super::event::Event;
use super::target::Target;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable index of a state inside a machine graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Side effect run synchronously when a state is entered or exited.
///
/// Hooks receive the machine context, which is their only channel to the
/// outside world.
pub type Hook<C> = Box<dyn FnMut(&mut C) + Send>;

/// A single state: a name, a transition table and optional hooks.
pub struct StateNode<C> {
    name: String,
    pub(crate) transitions: HashMap<Event, Target<C>>,
    pub(crate) on_entry: Option<Hook<C>>,
    pub(crate) on_exit: Option<Hook<C>>,
}

impl<C> StateNode<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: HashMap::new(),
            on_entry: None,
            on_exit: None,
        }
    }

    /// Diagnostic name for display and logging.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw target registered for an event, if any.
    pub fn target_for(&self, event: &Event) -> Option<&Target<C>> {
        self.transitions.get(event)
    }

    /// Whether the state reacts to the event at all.
    pub fn handles(&self, event: &Event) -> bool {
        self.transitions.contains_key(event)
    }

    pub(crate) fn enter(&mut self, ctx: &mut C) {
        if let Some(hook) = self.on_entry.as_mut() {
            hook(ctx);
        }
    }

    pub(crate) fn exit(&mut self, ctx: &mut C) {
        if let Some(hook) = self.on_exit.as_mut() {
            hook(ctx);
        }
    }
}

impl<C> std::fmt::Debug for StateNode<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateNode")
            .field("name", &self.name)
            .field("transitions", &self.transitions.len())
            .field("on_entry", &self.on_entry.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_name_returns_correct_value() {
        let state: StateNode<()> = StateNode::new("at computer");
        assert_eq!(state.name(), "at computer");
    }

    #[test]
    fn absent_event_is_not_handled() {
        let state: StateNode<()> = StateNode::new("idle");
        let event = Event::new("timeout");

        assert!(!state.handles(&event));
        assert!(state.target_for(&event).is_none());
    }

    #[test]
    fn hooks_run_against_context() {
        let mut state: StateNode<Vec<&'static str>> = StateNode::new("busy");
        state.on_entry = Some(Box::new(|log| log.push("entry")));
        state.on_exit = Some(Box::new(|log| log.push("exit")));

        let mut log = Vec::new();
        state.enter(&mut log);
        state.exit(&mut log);

        assert_eq!(log, vec!["entry", "exit"]);
    }

    #[test]
    fn missing_hooks_are_no_ops() {
        let mut state: StateNode<u32> = StateNode::new("quiet");
        let mut ctx = 5;

        state.enter(&mut ctx);
        state.exit(&mut ctx);

        assert_eq!(ctx, 5);
    }
}
