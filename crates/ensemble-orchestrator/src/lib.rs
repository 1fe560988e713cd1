//! Multi-assistant conversation orchestration for Ensemble.
//!
//! A user picks one or more permitted assistants; every message they type is
//! appended to one shared thread and answered by each selected assistant in
//! turn, strictly in selection order.
//!
//! # Overview
//!
//! - [`directory`]: catalog ∩ allow-list
//! - [`selector`]: interactive `1,3,4` selection with retry
//! - [`resources`]: files shared across the selection
//! - [`session`]: one thread, the turn loop and its sentinels
//! - [`poller`]: drives a run to a terminal status
//! - [`controller`]: ties the above together until the user exits
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ensemble_assistants::OpenAiClient;
//! use ensemble_orchestrator::SessionController;
//!
//! # async fn example(console: &mut dyn ensemble_orchestrator::Console) -> ensemble_orchestrator::Result<()> {
//! let api = Arc::new(OpenAiClient::from_env()?);
//! SessionController::new(api, "allowed_assistants.json")
//!     .run(console)
//!     .await
//! # }
//! ```

pub mod console;
pub mod controller;
pub mod directory;
pub mod error;
pub mod poller;
pub mod resources;
pub mod selector;
pub mod session;

#[cfg(test)]
mod testing;

pub use console::{Console, ConsoleError};
pub use controller::SessionController;
pub use directory::{list_allowed_assistants, AllowList, AllowListEntry};
pub use error::{DirectoryError, OrchestratorError, ResourceFetchError, Result};
pub use poller::{await_run, PollOutcome, PollState};
pub use resources::shared_resources;
pub use selector::{select_assistants, Selection};
pub use session::{Session, SessionOutcome, SessionState, TurnInput};
