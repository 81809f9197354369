//! Conditional junctions: ordered predicates with a default fallback.

use super::guard::Predicate;
use super::target::Destination;
use serde::{Deserialize, Serialize};

/// Stable index of a junction inside a machine graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JunctionId(usize);

impl JunctionId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A transition target resolved by evaluating ordered predicates.
///
/// The first branch whose predicate holds wins; when none hold, the default
/// destination is used. Branch destinations may themselves be junctions.
pub struct Junction<C> {
    name: String,
    branches: Vec<(Predicate<C>, Destination)>,
    default: Destination,
}

impl<C> Junction<C> {
    pub fn new(name: impl Into<String>, default: impl Into<Destination>) -> Self {
        Self {
            name: name.into(),
            branches: Vec::new(),
            default: default.into(),
        }
    }

    /// Append a branch. Branches are evaluated in registration order.
    pub fn add_condition<F>(&mut self, predicate: F, destination: impl Into<Destination>)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.branches.push((Box::new(predicate), destination.into()));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pick the destination for this context. Does not recurse.
    pub fn select(&self, ctx: &C) -> Destination {
        self.branches
            .iter()
            .find(|(predicate, _)| predicate(ctx))
            .map(|(_, destination)| *destination)
            .unwrap_or(self.default)
    }

    /// Every destination this junction can select, default last.
    pub fn destinations(&self) -> impl Iterator<Item = Destination> + '_ {
        self.branches
            .iter()
            .map(|(_, destination)| *destination)
            .chain(std::iter::once(self.default))
    }
}

impl<C> std::fmt::Debug for Junction<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Junction")
            .field("name", &self.name)
            .field("branches", &self.branches.len())
            .field("default", &self.default)
            .finish()
    }
}
