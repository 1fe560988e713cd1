//! Assistants service client for Ensemble.
//!
//! This crate is the boundary to the remote assistants service:
//!
//! - [`AssistantsApi`]: the operations the orchestrator consumes
//! - [`OpenAiClient`]: the HTTPS implementation
//! - Wire types: [`Assistant`], [`FileObject`], [`Thread`], [`Run`],
//!   [`RunStatus`], [`ThreadMessage`]
//!
//! # Example
//!
//! ```no_run
//! use ensemble_assistants::{AssistantsApi, OpenAiClient};
//!
//! # async fn example() -> ensemble_assistants::Result<()> {
//! let client = OpenAiClient::from_env()?;
//! for assistant in client.list_assistants().await? {
//!     println!("{} ({})", assistant.display_name(), assistant.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::AssistantsApi;
pub use client::{OpenAiClient, DEFAULT_BASE_URL, OPENAI_API_KEY_ENV, OPENAI_BASE_URL_ENV};
pub use error::{ApiError, Result};
pub use types::{
    Assistant, FileObject, MessageContent, MessageRole, Run, RunStatus, TextContent, Thread,
    ThreadMessage,
};
