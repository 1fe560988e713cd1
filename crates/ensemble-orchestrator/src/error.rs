//! Error types for the orchestrator.

use std::path::PathBuf;

use thiserror::Error;

use ensemble_assistants::ApiError;

use crate::console::ConsoleError;

/// The permitted assistants could not be determined. Fatal at startup.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Allow-list file could not be read.
    #[error("failed to read allow-list {path}: {source}")]
    AllowListRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Allow-list file is not a JSON array of `{"id": ...}` objects.
    #[error("malformed allow-list {path}: {source}")]
    AllowListParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Remote catalog call failed.
    #[error("failed to list assistants: {0}")]
    Catalog(#[source] ApiError),
}

/// File metadata lookup failed for one assistant. Recovered locally.
#[derive(Debug, Error)]
#[error("failed to fetch files for assistant '{assistant}': {source}")]
pub struct ResourceFetchError {
    /// Display name of the assistant.
    pub assistant: String,
    #[source]
    pub source: ApiError,
}

/// Orchestrator errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Directory could not be resolved.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Unexpected remote failure during a conversation.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Console failure.
    #[error("Console error: {0}")]
    Console(#[from] ConsoleError),

    /// A turn was attempted on a session that already ended.
    #[error("Session already ended")]
    SessionEnded,
}

impl OrchestratorError {
    /// Whether the process should exit with a failure status.
    pub fn is_fatal_startup(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
