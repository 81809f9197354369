//! Build errors for machine wiring.

use thiserror::Error;

/// Errors that can occur while wiring a state machine graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("State id {0} does not belong to this builder")]
    UnknownState(usize),

    #[error("Junction id {0} does not belong to this builder")]
    UnknownJunction(usize),

    #[error("State '{state}' already has a transition for event '{event}'")]
    DuplicateTransition { state: String, event: String },

    #[error("Junction '{junction}' can reach itself without passing through a state")]
    JunctionCycle { junction: String },
}
