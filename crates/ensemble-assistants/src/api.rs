//! The remote assistants service boundary.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Assistant, FileObject, Run, Thread, ThreadMessage};

/// Operations consumed from the assistants service.
///
/// Every call is a suspension point that resolves to a value or an error.
/// Implementations must be usable behind `Arc<dyn AssistantsApi>`.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// List every assistant in the catalog, in catalog order.
    async fn list_assistants(&self) -> Result<Vec<Assistant>>;

    /// Retrieve file metadata by id.
    async fn retrieve_file(&self, file_id: &str) -> Result<FileObject>;

    /// Create an empty thread.
    async fn create_thread(&self) -> Result<Thread>;

    /// Append a user message to a thread. `file_ids` is omitted when empty.
    async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
        file_ids: &[String],
    ) -> Result<ThreadMessage>;

    /// Start a run of `assistant_id` over the thread.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// Fetch the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List thread messages, oldest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;

    /// Ask the service to cancel a run.
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;
}
