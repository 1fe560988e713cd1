//! In-memory assistants service and scripted console for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use ensemble_assistants::{
    ApiError, Assistant, AssistantsApi, FileObject, MessageContent, MessageRole, Run, RunStatus,
    Thread, ThreadMessage,
};

use crate::console::{Console, ConsoleError};

/// A call observed by [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListAssistants,
    RetrieveFile(String),
    CreateThread(String),
    CreateMessage {
        thread_id: String,
        content: String,
        file_ids: Vec<String>,
    },
    CreateRun {
        thread_id: String,
        assistant_id: String,
    },
    RetrieveRun(String),
    ListMessages(String),
    CancelRun(String),
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    threads: u32,
    runs: HashMap<String, (String, String)>,
    run_scripts: HashMap<String, VecDeque<RunStatus>>,
    messages: HashMap<String, Vec<ThreadMessage>>,
    replied: HashSet<String>,
    next_id: u32,
}

/// Scriptable in-memory [`AssistantsApi`].
///
/// Runs follow a per-assistant status script (the last status repeats).
/// A run that reports `completed` posts the assistant's reply on the thread.
#[derive(Default)]
pub struct MockApi {
    assistants: Vec<Assistant>,
    files: HashMap<String, FileObject>,
    failing_files: HashSet<String>,
    catalog_fails: bool,
    scripts: HashMap<String, Vec<RunStatus>>,
    replies: HashMap<String, Vec<String>>,
    silent: HashSet<String>,
    state: Mutex<MockState>,
}

impl MockApi {
    pub fn new(assistants: Vec<Assistant>) -> Self {
        Self {
            assistants,
            ..Self::default()
        }
    }

    pub fn with_file(mut self, id: &str, filename: &str) -> Self {
        self.files.insert(
            id.to_string(),
            FileObject {
                id: id.to_string(),
                filename: filename.to_string(),
                bytes: None,
            },
        );
        self
    }

    pub fn with_failing_file(mut self, id: &str) -> Self {
        self.failing_files.insert(id.to_string());
        self
    }

    pub fn with_failing_catalog(mut self) -> Self {
        self.catalog_fails = true;
        self
    }

    pub fn with_run_script(mut self, assistant_id: &str, statuses: Vec<RunStatus>) -> Self {
        self.scripts.insert(assistant_id.to_string(), statuses);
        self
    }

    /// Reply as several text parts.
    pub fn with_reply_parts(mut self, assistant_id: &str, parts: &[&str]) -> Self {
        self.replies.insert(
            assistant_id.to_string(),
            parts.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    /// Completed runs of this assistant post no message.
    pub fn with_silent(mut self, assistant_id: &str) -> Self {
        self.silent.insert(assistant_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than status polling.
    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::CreateThread(_) | Call::CreateMessage { .. } | Call::CreateRun { .. }
                )
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn reply_for(&self, assistant_id: &str) -> Vec<MessageContent> {
        match self.replies.get(assistant_id) {
            Some(parts) => parts.iter().map(MessageContent::text).collect(),
            None => vec![MessageContent::text(format!("reply from {}", assistant_id))],
        }
    }
}

#[async_trait]
impl AssistantsApi for MockApi {
    async fn list_assistants(&self) -> ensemble_assistants::Result<Vec<Assistant>> {
        self.record(Call::ListAssistants);
        if self.catalog_fails {
            return Err(ApiError::Status {
                status: 500,
                body: "catalog unavailable".into(),
            });
        }
        Ok(self.assistants.clone())
    }

    async fn retrieve_file(&self, file_id: &str) -> ensemble_assistants::Result<FileObject> {
        self.record(Call::RetrieveFile(file_id.to_string()));
        if self.failing_files.contains(file_id) {
            return Err(ApiError::Status {
                status: 404,
                body: format!("No such File object: {}", file_id),
            });
        }
        self.files.get(file_id).cloned().ok_or_else(|| ApiError::Status {
            status: 404,
            body: format!("No such File object: {}", file_id),
        })
    }

    async fn create_thread(&self) -> ensemble_assistants::Result<Thread> {
        let mut state = self.state.lock().unwrap();
        state.threads += 1;
        let id = format!("thread_{}", state.threads);
        state.calls.push(Call::CreateThread(id.clone()));
        Ok(Thread { id })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
        file_ids: &[String],
    ) -> ensemble_assistants::Result<ThreadMessage> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateMessage {
            thread_id: thread_id.to_string(),
            content: content.to_string(),
            file_ids: file_ids.to_vec(),
        });
        state.next_id += 1;
        let message = ThreadMessage {
            id: format!("msg_{}", state.next_id),
            role: MessageRole::User,
            run_id: None,
            content: vec![MessageContent::text(content)],
        };
        state
            .messages
            .entry(thread_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> ensemble_assistants::Result<Run> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateRun {
            thread_id: thread_id.to_string(),
            assistant_id: assistant_id.to_string(),
        });
        state.next_id += 1;
        let id = format!("run_{}", state.next_id);
        let script = self
            .scripts
            .get(assistant_id)
            .cloned()
            .unwrap_or_else(|| vec![RunStatus::Completed]);
        state.run_scripts.insert(id.clone(), script.into());
        state
            .runs
            .insert(id.clone(), (thread_id.to_string(), assistant_id.to_string()));
        Ok(Run {
            id,
            thread_id: thread_id.to_string(),
            assistant_id: assistant_id.to_string(),
            status: RunStatus::Queued,
        })
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> ensemble_assistants::Result<Run> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::RetrieveRun(run_id.to_string()));

        let (_, assistant_id) = state
            .runs
            .get(run_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: format!("No run found with id '{}'", run_id),
            })?;

        let status = {
            let script = state.run_scripts.entry(run_id.to_string()).or_default();
            if script.len() > 1 {
                script.pop_front().unwrap_or(RunStatus::Completed)
            } else {
                script.front().copied().unwrap_or(RunStatus::Completed)
            }
        };

        let first_completion = status.is_completed() && state.replied.insert(run_id.to_string());
        if first_completion && !self.silent.contains(&assistant_id) {
            state.next_id += 1;
            let message = ThreadMessage {
                id: format!("msg_{}", state.next_id),
                role: MessageRole::Assistant,
                run_id: Some(run_id.to_string()),
                content: self.reply_for(&assistant_id),
            };
            state
                .messages
                .entry(thread_id.to_string())
                .or_default()
                .push(message);
        }

        Ok(Run {
            id: run_id.to_string(),
            thread_id: thread_id.to_string(),
            assistant_id,
            status,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> ensemble_assistants::Result<Vec<ThreadMessage>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListMessages(thread_id.to_string()));
        Ok(state.messages.get(thread_id).cloned().unwrap_or_default())
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> ensemble_assistants::Result<Run> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CancelRun(run_id.to_string()));
        let assistant_id = state
            .runs
            .get(run_id)
            .map(|(_, a)| a.clone())
            .unwrap_or_default();
        Ok(Run {
            id: run_id.to_string(),
            thread_id: thread_id.to_string(),
            assistant_id,
            status: RunStatus::Cancelling,
        })
    }
}

/// Console fed from a fixed list of lines; records everything printed.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.output.join("\n")
    }

    pub fn count(&self, needle: &str) -> usize {
        self.output.iter().filter(|l| l.contains(needle)).count()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ConsoleError> {
        self.prompts.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn println(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}

/// Four named assistants, `asst_1` .. `asst_4`.
pub fn four_assistants() -> Vec<Assistant> {
    vec![
        Assistant::new("asst_1", "Writer"),
        Assistant::new("asst_2", "Critic"),
        Assistant::new("asst_3", "Editor"),
        Assistant::new("asst_4", "Researcher"),
    ]
}
