//! Builder API for wiring state machine graphs.
//!
//! Graphs are wired in two phases: allocate every state and junction to get
//! their ids, then fill in transition tables that refer to those ids. This
//! keeps cyclic graphs free of shared ownership.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::MachineBuilder;
