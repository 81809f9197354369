//! Arena of states and junctions, plus pure target resolution.

use super::junction::{Junction, JunctionId};
use super::state::{StateId, StateNode};
use super::target::{Destination, Target};

/// Frozen transition graph.
///
/// Produced by [`MachineBuilder::build`](crate::builder::MachineBuilder::build),
/// which guarantees that every id stored in the graph is in bounds and that
/// junctions never form a cycle.
pub struct Graph<C> {
    pub(crate) states: Vec<StateNode<C>>,
    pub(crate) junctions: Vec<Junction<C>>,
}

impl<C> Graph<C> {
    pub fn state(&self, id: StateId) -> Option<&StateNode<C>> {
        self.states.get(id.index())
    }

    pub fn junction(&self, id: JunctionId) -> Option<&Junction<C>> {
        self.junctions.get(id.index())
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Name of a state, or `"?"` for an id from another graph.
    pub fn state_name(&self, id: StateId) -> &str {
        self.state(id).map(StateNode::name).unwrap_or("?")
    }

    /// Decide whether a raw target leads anywhere.
    ///
    /// Returns `None` when the target means "no transition": `Null`, or a
    /// guard whose predicate is false. Junctions are left unresolved so the
    /// caller can pick a branch after the exit hook has run.
    pub fn admit(&self, target: &Target<C>, ctx: &C) -> Option<Destination> {
        match target {
            Target::State(id) => Some(Destination::State(*id)),
            Target::Junction(id) => Some(Destination::Junction(*id)),
            Target::Guarded(guard) => {
                if guard.check(ctx) {
                    self.admit(guard.target(), ctx)
                } else {
                    None
                }
            }
            Target::Null => None,
        }
    }

    /// Resolve a raw target into a concrete state against one context.
    ///
    /// Predicates are evaluated without side effects.
    pub fn resolve(&self, target: &Target<C>, ctx: &C) -> Option<StateId> {
        self.admit(target, ctx)
            .map(|destination| self.resolve_destination(destination, ctx))
    }

    /// Follow junctions until a concrete state is reached.
    pub fn resolve_destination(&self, destination: Destination, ctx: &C) -> StateId {
        let mut current = destination;
        loop {
            match current {
                Destination::State(id) => return id,
                Destination::Junction(id) => current = self.junctions[id.index()].select(ctx),
            }
        }
    }
}

impl<C> std::fmt::Debug for Graph<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("states", &self.states)
            .field("junctions", &self.junctions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        short_first: bool,
        allow: bool,
    }

    // a, b, c plus a junction choosing a (when short_first) or b, and an
    // outer junction that defers to the inner one.
    fn graph() -> (Graph<Ctx>, [StateId; 3], [JunctionId; 2]) {
        let ids = [
            StateId::from_index(0),
            StateId::from_index(1),
            StateId::from_index(2),
        ];
        let inner_id = JunctionId::from_index(0);
        let outer_id = JunctionId::from_index(1);

        let mut inner = Junction::new("inner", ids[1]);
        inner.add_condition(|c: &Ctx| c.short_first, ids[0]);

        let mut outer = Junction::new("outer", inner_id);
        outer.add_condition(|c: &Ctx| !c.allow, ids[2]);

        let graph = Graph {
            states: vec![
                StateNode::new("a"),
                StateNode::new("b"),
                StateNode::new("c"),
            ],
            junctions: vec![inner, outer],
        };
        (graph, ids, [inner_id, outer_id])
    }

    #[test]
    fn state_target_resolves_to_itself() {
        let (graph, ids, _) = graph();
        let ctx = Ctx {
            short_first: false,
            allow: true,
        };

        assert_eq!(graph.resolve(&Target::State(ids[2]), &ctx), Some(ids[2]));
    }

    #[test]
    fn null_target_resolves_to_nothing() {
        let (graph, _, _) = graph();
        let ctx = Ctx {
            short_first: true,
            allow: true,
        };

        assert_eq!(graph.resolve(&Target::Null, &ctx), None);
    }

    #[test]
    fn junctions_resolve_recursively() {
        let (graph, ids, [_, outer]) = graph();

        let ctx = Ctx {
            short_first: true,
            allow: true,
        };
        assert_eq!(graph.resolve(&Target::Junction(outer), &ctx), Some(ids[0]));

        let ctx = Ctx {
            short_first: false,
            allow: true,
        };
        assert_eq!(graph.resolve(&Target::Junction(outer), &ctx), Some(ids[1]));

        let ctx = Ctx {
            short_first: true,
            allow: false,
        };
        assert_eq!(graph.resolve(&Target::Junction(outer), &ctx), Some(ids[2]));
    }

    #[test]
    fn guard_continues_into_junction() {
        let (graph, ids, [inner, _]) = graph();
        let target = Target::guarded(|c: &Ctx| c.allow, Target::Junction(inner));

        let ctx = Ctx {
            short_first: true,
            allow: true,
        };
        assert_eq!(graph.resolve(&target, &ctx), Some(ids[0]));
    }

    #[test]
    fn false_guard_means_no_transition() {
        let (graph, ids, _) = graph();
        let target = Target::guarded(|c: &Ctx| c.allow, Target::State(ids[1]));

        let ctx = Ctx {
            short_first: true,
            allow: false,
        };
        assert_eq!(graph.resolve(&target, &ctx), None);
    }

    #[test]
    fn admit_leaves_junctions_unresolved() {
        let (graph, ids, [inner, _]) = graph();
        let target = Target::guarded(|c: &Ctx| c.allow, Target::Junction(inner));

        let ctx = Ctx {
            short_first: true,
            allow: true,
        };
        assert_eq!(graph.admit(&target, &ctx), Some(Destination::Junction(inner)));
        assert_eq!(
            graph.admit(&Target::State(ids[1]), &ctx),
            Some(Destination::State(ids[1]))
        );

        let ctx = Ctx {
            short_first: true,
            allow: false,
        };
        assert_eq!(graph.admit(&target, &ctx), None);
        assert_eq!(graph.admit(&Target::Null, &ctx), None);
    }

    #[test]
    fn state_names() {
        let (graph, ids, _) = graph();

        assert_eq!(graph.state_name(ids[2]), "c");
        assert_eq!(graph.state_name(StateId::from_index(9)), "?");
    }
}
