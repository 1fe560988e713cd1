//! Session controller: the main interaction loop.
//!
//! selection → shared files → session → (exit | reselect) → repeat.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use ensemble_assistants::{Assistant, AssistantsApi};
use ensemble_core::PollPolicy;

use crate::console::Console;
use crate::directory::{list_allowed_assistants, AllowList};
use crate::error::Result;
use crate::resources::shared_resources;
use crate::selector::select_assistants;
use crate::session::{Session, SessionOutcome};

/// Printed when the allow-list permits none of the catalog's assistants.
pub const NO_ASSISTANTS: &str = "No permitted assistants are available. Check the allow-list.";

/// Drives selection and sessions until the user exits.
pub struct SessionController {
    api: Arc<dyn AssistantsApi>,
    allow_list_path: PathBuf,
    policy: PollPolicy,
}

impl SessionController {
    /// Create a controller reading the allow-list at `allow_list_path`.
    pub fn new(api: Arc<dyn AssistantsApi>, allow_list_path: impl Into<PathBuf>) -> Self {
        Self {
            api,
            allow_list_path: allow_list_path.into(),
            policy: PollPolicy::default(),
        }
    }

    /// Set the run polling policy.
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn allow_list_path(&self) -> &Path {
        &self.allow_list_path
    }

    /// Load the allow-list and intersect it with the remote catalog.
    pub async fn list_allowed(&self) -> Result<Vec<Assistant>> {
        let allow_list = AllowList::load(&self.allow_list_path)?;
        Ok(list_allowed_assistants(self.api.as_ref(), &allow_list).await?)
    }

    /// Run until the user exits or input closes.
    pub async fn run(&self, console: &mut dyn Console) -> Result<()> {
        let assistants = self.list_allowed().await?;

        if assistants.is_empty() {
            console.println(NO_ASSISTANTS);
        } else {
            self.converse(console, &assistants).await?;
        }

        console.println("");
        console.println("Goodbye!");
        console.println("");
        Ok(())
    }

    async fn converse(&self, console: &mut dyn Console, assistants: &[Assistant]) -> Result<()> {
        loop {
            let Some(selection) = select_assistants(console, assistants)? else {
                return Ok(());
            };

            let file_ids = shared_resources(self.api.as_ref(), console, &selection).await;
            console.println("");
            console.println(&format!(
                "Welcome! You are now using the following assistants: {}",
                selection.names()
            ));

            let mut session = Session::new(self.api.as_ref(), &selection, &file_ids, &self.policy);
            match session.run(console).await? {
                SessionOutcome::Exit => return Ok(()),
                SessionOutcome::Reselect => {
                    info!("Selection cleared; choosing assistants again");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DirectoryError, OrchestratorError};
    use crate::selector::INVALID_SELECTION;
    use crate::testing::{four_assistants, Call, MockApi, ScriptedConsole};
    use tempfile::TempDir;

    fn allow_list(ids: &[&str]) -> (TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("allowed_assistants.json");
        let entries: Vec<_> = ids.iter().map(|id| serde_json::json!({"id": id})).collect();
        std::fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();
        (temp_dir, path)
    }

    fn controller(api: Arc<MockApi>, path: PathBuf) -> SessionController {
        SessionController::new(api, path).with_poll_policy(PollPolicy::immediate())
    }

    #[tokio::test]
    async fn test_full_conversation_with_reselect() {
        let api = Arc::new(MockApi::new(four_assistants()));
        let (_dir, path) = allow_list(&["asst_1", "asst_2", "asst_3"]);
        let mut console = ScriptedConsole::new(&["1,2", "hello", "new", "3", "again", "exit"]);

        controller(api.clone(), path).run(&mut console).await.unwrap();

        // The menu lists the full directory both times.
        assert_eq!(console.count("3. Editor"), 2);
        assert_eq!(console.count("Researcher"), 0);
        assert_eq!(
            console.count("Welcome! You are now using the following assistants: Writer, Critic"),
            1
        );
        assert_eq!(
            console.count("Welcome! You are now using the following assistants: Editor"),
            1
        );

        assert_eq!(
            api.mutating_calls(),
            vec![
                Call::CreateThread("thread_1".into()),
                Call::CreateMessage {
                    thread_id: "thread_1".into(),
                    content: "hello".into(),
                    file_ids: vec![],
                },
                Call::CreateRun {
                    thread_id: "thread_1".into(),
                    assistant_id: "asst_1".into(),
                },
                Call::CreateMessage {
                    thread_id: "thread_1".into(),
                    content: "hello".into(),
                    file_ids: vec![],
                },
                Call::CreateRun {
                    thread_id: "thread_1".into(),
                    assistant_id: "asst_2".into(),
                },
                Call::CreateThread("thread_2".into()),
                Call::CreateMessage {
                    thread_id: "thread_2".into(),
                    content: "again".into(),
                    file_ids: vec![],
                },
                Call::CreateRun {
                    thread_id: "thread_2".into(),
                    assistant_id: "asst_3".into(),
                },
            ]
        );
        assert_eq!(console.output.last().map(String::as_str), Some(""));
        assert_eq!(console.count("Goodbye!"), 1);
    }

    #[tokio::test]
    async fn test_invalid_selection_then_exit() {
        let api = Arc::new(MockApi::new(four_assistants()));
        let (_dir, path) = allow_list(&["asst_1", "asst_2", "asst_3", "asst_4"]);
        let mut console = ScriptedConsole::new(&["9,abc", "2, 4", "exit"]);

        controller(api.clone(), path).run(&mut console).await.unwrap();

        assert_eq!(console.count(INVALID_SELECTION), 1);
        assert_eq!(
            console.count("Welcome! You are now using the following assistants: Critic, Researcher"),
            1
        );
        assert_eq!(api.mutating_calls(), vec![Call::CreateThread("thread_1".into())]);
    }

    #[tokio::test]
    async fn test_shared_files_from_first_assistant() {
        let assistants = vec![
            Assistant::new("asst_1", "Writer").with_files(["file_a"]),
            Assistant::new("asst_2", "Critic").with_files(["file_a"]),
        ];
        let api = Arc::new(MockApi::new(assistants).with_file("file_a", "style.md"));
        let (_dir, path) = allow_list(&["asst_1", "asst_2"]);
        let mut console = ScriptedConsole::new(&["1,2", "review", "exit"]);

        controller(api.clone(), path).run(&mut console).await.unwrap();

        let appended: Vec<_> = api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateMessage { file_ids, .. } => Some(file_ids),
                _ => None,
            })
            .collect();
        assert_eq!(appended, vec![vec!["file_a".to_string()]; 2]);
        assert_eq!(console.count("1. style.md (ID: file_a)"), 2);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_fatal() {
        let api = Arc::new(MockApi::new(four_assistants()).with_failing_catalog());
        let (_dir, path) = allow_list(&["asst_1"]);
        let mut console = ScriptedConsole::new(&["1"]);

        let err = controller(api, path).run(&mut console).await.unwrap_err();
        assert!(err.is_fatal_startup());
        assert!(console.prompts.is_empty());
    }

    #[tokio::test]
    async fn test_missing_allow_list_is_fatal() {
        let api = Arc::new(MockApi::new(four_assistants()));
        let mut console = ScriptedConsole::default();

        let err = controller(api, PathBuf::from("/nonexistent/allowed_assistants.json"))
            .run(&mut console)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Directory(DirectoryError::AllowListRead { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_directory_ends_normally() {
        let api = Arc::new(MockApi::new(four_assistants()));
        let (_dir, path) = allow_list(&["asst_unknown"]);
        let mut console = ScriptedConsole::new(&["1"]);

        controller(api, path).run(&mut console).await.unwrap();

        assert_eq!(console.count(NO_ASSISTANTS), 1);
        assert!(console.prompts.is_empty());
    }

    #[tokio::test]
    async fn test_input_closed_during_selection() {
        let api = Arc::new(MockApi::new(four_assistants()));
        let (_dir, path) = allow_list(&["asst_1"]);
        let mut console = ScriptedConsole::default();

        controller(api.clone(), path).run(&mut console).await.unwrap();

        assert_eq!(console.count("Goodbye!"), 1);
        assert!(api.mutating_calls().is_empty());
    }
}
