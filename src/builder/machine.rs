//! Builder for wiring state machine graphs.

use crate::builder::error::BuildError;
use crate::core::{
    Destination, Event, Graph, Junction, JunctionId, StateId, StateNode, Target,
    DEFAULT_LOG_CAPACITY,
};
use crate::dispatch::StateMachine;

/// Builder for constructing a machine graph.
///
/// States and junctions are allocated first and handed out as ids, so
/// transition tables can refer to states that point back at each other.
/// Nothing is validated until [`build`](Self::build), except that a state's
/// table may hold only one target per event.
///
/// # Example
///
/// ```rust
/// use gentle::builder::MachineBuilder;
/// use gentle::core::Event;
///
/// let tick = Event::new("tick");
///
/// let mut builder = MachineBuilder::<u32>::new();
/// let red = builder.state("red");
/// let green = builder.state("green");
/// builder.on_entry(green, |count| *count += 1).unwrap();
/// builder.transition(red, &tick, green).unwrap();
/// builder.transition(green, &tick, red).unwrap();
/// builder.initial(red);
///
/// let mut machine = builder.build(0).unwrap();
/// machine.process_event(&tick);
/// assert_eq!(machine.current_state(), green);
/// assert_eq!(*machine.context(), 1);
/// ```
pub struct MachineBuilder<C> {
    states: Vec<StateNode<C>>,
    junctions: Vec<Junction<C>>,
    initial: Option<StateId>,
    log_capacity: usize,
}

impl<C> MachineBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            junctions: Vec::new(),
            initial: None,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }

    /// Allocate a state and return its id.
    pub fn state(&mut self, name: impl Into<String>) -> StateId {
        self.states.push(StateNode::new(name));
        StateId::from_index(self.states.len() - 1)
    }

    /// Allocate a conditional junction with its default destination.
    pub fn junction(
        &mut self,
        name: impl Into<String>,
        default: impl Into<Destination>,
    ) -> JunctionId {
        self.junctions.push(Junction::new(name, default));
        JunctionId::from_index(self.junctions.len() - 1)
    }

    /// Append a branch to a junction.
    pub fn condition<F>(
        &mut self,
        junction: JunctionId,
        predicate: F,
        destination: impl Into<Destination>,
    ) -> Result<&mut Self, BuildError>
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.junctions
            .get_mut(junction.index())
            .ok_or(BuildError::UnknownJunction(junction.index()))?
            .add_condition(predicate, destination);
        Ok(self)
    }

    /// Set the hook run when `state` is entered.
    pub fn on_entry<F>(&mut self, state: StateId, hook: F) -> Result<&mut Self, BuildError>
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.node_mut(state)?.on_entry = Some(Box::new(hook));
        Ok(self)
    }

    /// Set the hook run when `state` is exited.
    pub fn on_exit<F>(&mut self, state: StateId, hook: F) -> Result<&mut Self, BuildError>
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.node_mut(state)?.on_exit = Some(Box::new(hook));
        Ok(self)
    }

    /// Register the target for `event` in `from`'s transition table.
    pub fn transition(
        &mut self,
        from: StateId,
        event: &Event,
        target: impl Into<Target<C>>,
    ) -> Result<&mut Self, BuildError> {
        let node = self.node_mut(from)?;
        if node.transitions.contains_key(event) {
            return Err(BuildError::DuplicateTransition {
                state: node.name().to_string(),
                event: event.name().to_string(),
            });
        }
        node.transitions.insert(event.clone(), target.into());
        Ok(self)
    }

    /// Set the initial state (required).
    pub fn initial(&mut self, state: StateId) -> &mut Self {
        self.initial = Some(state);
        self
    }

    /// Number of transitions retained in the machine's log.
    pub fn log_capacity(&mut self, capacity: usize) -> &mut Self {
        self.log_capacity = capacity;
        self
    }

    /// Validate and freeze the graph.
    pub fn build_graph(self) -> Result<(Graph<C>, StateId), BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let graph = Graph {
            states: self.states,
            junctions: self.junctions,
        };

        check_state(&graph, initial)?;
        for node in &graph.states {
            for target in node.transitions.values() {
                check_target(&graph, target)?;
            }
        }
        for junction in &graph.junctions {
            for destination in junction.destinations() {
                check_destination(&graph, destination)?;
            }
        }
        check_junction_cycles(&graph)?;

        Ok((graph, initial))
    }

    /// Validate the graph and hand it to a dispatcher owning `context`.
    ///
    /// The initial state's entry hook is not run; see
    /// [`StateMachine::start`].
    pub fn build(self, context: C) -> Result<StateMachine<C>, BuildError> {
        let log_capacity = self.log_capacity;
        let (graph, initial) = self.build_graph()?;
        Ok(StateMachine::new(graph, initial, context, log_capacity))
    }

    fn node_mut(&mut self, id: StateId) -> Result<&mut StateNode<C>, BuildError> {
        self.states
            .get_mut(id.index())
            .ok_or(BuildError::UnknownState(id.index()))
    }
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_state<C>(graph: &Graph<C>, id: StateId) -> Result<(), BuildError> {
    graph
        .state(id)
        .map(|_| ())
        .ok_or(BuildError::UnknownState(id.index()))
}

fn check_junction<C>(graph: &Graph<C>, id: JunctionId) -> Result<(), BuildError> {
    graph
        .junction(id)
        .map(|_| ())
        .ok_or(BuildError::UnknownJunction(id.index()))
}

fn check_destination<C>(graph: &Graph<C>, destination: Destination) -> Result<(), BuildError> {
    match destination {
        Destination::State(id) => check_state(graph, id),
        Destination::Junction(id) => check_junction(graph, id),
    }
}

fn check_target<C>(graph: &Graph<C>, target: &Target<C>) -> Result<(), BuildError> {
    match target {
        Target::State(id) => check_state(graph, *id),
        Target::Junction(id) => check_junction(graph, *id),
        Target::Guarded(guard) => check_target(graph, guard.target()),
        Target::Null => Ok(()),
    }
}

// Depth-first search over junction -> junction edges.
fn check_junction_cycles<C>(graph: &Graph<C>) -> Result<(), BuildError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    fn visit<C>(graph: &Graph<C>, index: usize, marks: &mut [Mark]) -> Result<(), BuildError> {
        match marks[index] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                return Err(BuildError::JunctionCycle {
                    junction: graph.junctions[index].name().to_string(),
                })
            }
            Mark::Unvisited => {}
        }
        marks[index] = Mark::InProgress;
        for destination in graph.junctions[index].destinations() {
            if let Destination::Junction(next) = destination {
                visit(graph, next.index(), marks)?;
            }
        }
        marks[index] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; graph.junctions.len()];
    for index in 0..graph.junctions.len() {
        visit(graph, index, &mut marks)?;
    }
    Ok(())
}
