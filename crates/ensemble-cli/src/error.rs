//! Error types for the command-line front end.

use thiserror::Error;

use ensemble_assistants::ApiError;
use ensemble_orchestrator::OrchestratorError;

/// Errors surfaced by the `ensemble` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The API client could not be configured.
    #[error("{0}")]
    Client(#[from] ApiError),

    /// The line editor could not be started.
    #[error("Console error: {0}")]
    Console(#[from] rustyline::error::ReadlineError),

    /// The async runtime could not be started.
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    /// The conversation failed.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

impl CliError {
    /// Whether the process should exit with status 1.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Client(_) => true,
            Self::Orchestrator(e) => e.is_fatal_startup(),
            Self::Console(_) | Self::Runtime(_) => false,
        }
    }
}

/// Result type for the command-line front end.
pub type Result<T> = std::result::Result<T, CliError>;
