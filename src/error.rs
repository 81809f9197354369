//! Crate-level error type.

use crate::builder::BuildError;
use crate::reminder::ConfigError;
use thiserror::Error;

/// Errors surfaced by the application layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to wire state machine: {0}")]
    Build(#[from] BuildError),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
