//! Single-threaded dispatcher that owns the current state.

use crate::core::{Event, Graph, StateId, StateNode, TransitionLog, TransitionRecord};
use crate::dispatch::outcome::Dispatch;
use chrono::Utc;
use tracing::{debug, trace};

/// State machine dispatcher.
///
/// Owns the frozen graph, the current state and the context object that
/// hooks and predicates work against. Dispatch takes `&mut self` and hooks
/// only ever see the context, so a hook cannot re-enter `process_event`
/// while a transition is in flight; follow-up events belong in the context
/// and are dispatched by the owner afterwards.
pub struct StateMachine<C> {
    graph: Graph<C>,
    current: StateId,
    context: C,
    log: TransitionLog,
    started: bool,
}

impl<C> StateMachine<C> {
    /// Create a dispatcher sitting in `initial`.
    ///
    /// The initial state's entry hook is *not* run here; call
    /// [`start`](Self::start) once wiring is complete.
    pub(crate) fn new(graph: Graph<C>, initial: StateId, context: C, log_capacity: usize) -> Self {
        Self {
            graph,
            current: initial,
            context,
            log: TransitionLog::with_capacity(log_capacity),
            started: false,
        }
    }

    /// Run the initial state's entry hook.
    ///
    /// Returns `false` (and does nothing) if the machine was already started.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        debug!(state = %self.current_name(), "starting state machine");
        let (node, ctx) = self.split(self.current);
        node.enter(ctx);
        true
    }

    /// Feed one event through the current state's transition table.
    ///
    /// Guards are checked first; `Null` or a false guard ends dispatch with
    /// no hooks. Otherwise the current state's exit hook runs, junctions are
    /// resolved against the context the exit hook left behind, and the new
    /// state's entry hook runs, all before this returns. A self-transition
    /// runs both hooks. Panics raised by predicates or hooks propagate to the
    /// caller.
    pub fn process_event(&mut self, event: &Event) -> Dispatch {
        let from = self.current;
        let Some(target) = self.graph.states[from.index()].target_for(event) else {
            trace!(state = %self.current_name(), event = %event, "event not handled");
            return Dispatch::Unhandled;
        };

        let Some(destination) = self.graph.admit(target, &self.context) else {
            trace!(state = %self.current_name(), event = %event, "event consumed");
            return Dispatch::Consumed;
        };

        let (node, ctx) = self.split(from);
        node.exit(ctx);
        let to = self.graph.resolve_destination(destination, &self.context);

        debug!(
            from = %self.graph.state_name(from),
            to = %self.graph.state_name(to),
            event = %event,
            "transition"
        );

        self.current = to;
        let (node, ctx) = self.split(to);
        node.enter(ctx);

        self.log.record(TransitionRecord {
            from: self.graph.state_name(from).to_string(),
            to: self.graph.state_name(to).to_string(),
            event: event.name().to_string(),
            timestamp: Utc::now(),
        });

        Dispatch::Transitioned { from, to }
    }

    /// Get current state
    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn current_name(&self) -> &str {
        self.graph.state_name(self.current)
    }

    pub fn is_in(&self, state: StateId) -> bool {
        self.current == state
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the context between dispatches.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn graph(&self) -> &Graph<C> {
        &self.graph
    }

    /// Recent transitions, oldest first.
    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    fn split(&mut self, id: StateId) -> (&mut StateNode<C>, &mut C) {
        (&mut self.graph.states[id.index()], &mut self.context)
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_name())
            .field("context", &self.context)
            .field("started", &self.started)
            .finish()
    }
}
