//! Files shared by the assistants of a selection.
//!
//! Every selected assistant's files are listed for visibility, but the set
//! attached to messages is the first assistant's. A mismatch is reported
//! and otherwise left alone.

use futures::future::try_join_all;
use tracing::{debug, warn};

use ensemble_assistants::{Assistant, AssistantsApi, FileObject};

use crate::console::Console;
use crate::error::ResourceFetchError;
use crate::selector::Selection;

/// Fetch metadata for every file attached to one assistant.
pub async fn files_for(
    api: &dyn AssistantsApi,
    assistant: &Assistant,
) -> Result<Vec<FileObject>, ResourceFetchError> {
    try_join_all(assistant.file_ids.iter().map(|id| api.retrieve_file(id)))
        .await
        .map_err(|source| ResourceFetchError {
            assistant: assistant.display_name().to_string(),
            source,
        })
}

/// List the files of each selected assistant and return the shared file ids.
pub async fn shared_resources(
    api: &dyn AssistantsApi,
    console: &mut dyn Console,
    selection: &Selection,
) -> Vec<String> {
    let shared = selection.first().file_ids.clone();

    for assistant in selection.assistants() {
        console.println("");
        console.println(&format!(
            "Files available for assistant '{}':",
            assistant.display_name()
        ));

        match files_for(api, assistant).await {
            Ok(files) => {
                for (index, file) in files.iter().enumerate() {
                    console.println(&format!("{}. {} (ID: {})", index + 1, file.filename, file.id));
                }
            }
            Err(e) => {
                warn!(assistant = %e.assistant, error = %e.source, "File lookup failed");
                console.println(&format!("Error: {}", e));
            }
        }

        if assistant.file_ids != shared {
            warn!(
                assistant = %assistant.display_name(),
                first = %selection.first().display_name(),
                "Assistant files differ from the first selected assistant"
            );
            console.println(&format!(
                "Warning: files of '{}' differ from '{}'; messages carry the files of '{}'.",
                assistant.display_name(),
                selection.first().display_name(),
                selection.first().display_name()
            ));
        }
    }

    debug!(files = shared.len(), "Shared resources resolved");
    shared
}
