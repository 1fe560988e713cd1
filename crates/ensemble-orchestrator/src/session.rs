//! Conversation session: one remote thread shared by every selected assistant.
//!
//! Each user turn is appended to the thread once per assistant and answered
//! by that assistant's run, strictly in selection order. Later assistants
//! therefore see the earlier assistants' replies.

use tracing::{debug, info, warn};

use ensemble_assistants::{AssistantsApi, MessageRole, Run, ThreadMessage};
use ensemble_core::PollPolicy;

use crate::console::Console;
use crate::error::{OrchestratorError, Result};
use crate::poller::{await_run, PollState};
use crate::selector::Selection;

/// Prompt shown for each turn.
pub const INPUT_PROMPT: &str = "Input: ";

/// A line of user input, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnInput {
    /// `exit`: end the program.
    Exit,
    /// `new`: go back to assistant selection.
    Reselect,
    /// Nothing to send.
    Blank,
    /// Conversational content, sent verbatim.
    Message(String),
}

impl TurnInput {
    /// Sentinels match case-insensitively after trimming.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("exit") {
            Self::Exit
        } else if trimmed.eq_ignore_ascii_case("new") {
            Self::Reselect
        } else if trimmed.is_empty() {
            Self::Blank
        } else {
            Self::Message(line.to_string())
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Terminate the program.
    Exit,
    /// Clear the selection and choose again.
    Reselect,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No thread yet.
    Idle,
    /// Thread created, accepting turns.
    Active { thread_id: String },
    /// Exit or reselect requested.
    Ended(SessionOutcome),
}

/// One conversation over a shared thread.
pub struct Session<'a> {
    api: &'a dyn AssistantsApi,
    selection: &'a Selection,
    file_ids: &'a [String],
    policy: &'a PollPolicy,
    state: SessionState,
}

impl<'a> Session<'a> {
    pub fn new(
        api: &'a dyn AssistantsApi,
        selection: &'a Selection,
        file_ids: &'a [String],
        policy: &'a PollPolicy,
    ) -> Self {
        Self {
            api,
            selection,
            file_ids,
            policy,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Create the remote thread on first use and return its id.
    pub async fn open(&mut self) -> Result<String> {
        if self.state == SessionState::Idle {
            let thread = self.api.create_thread().await?;
            info!(thread_id = %thread.id, assistants = %self.selection.names(), "Session opened");
            self.state = SessionState::Active {
                thread_id: thread.id,
            };
        }

        match &self.state {
            SessionState::Active { thread_id } => Ok(thread_id.clone()),
            _ => Err(OrchestratorError::SessionEnded),
        }
    }

    /// Run turns until the user exits or asks to reselect.
    pub async fn run(&mut self, console: &mut dyn Console) -> Result<SessionOutcome> {
        self.open().await?;

        loop {
            console.println("");
            let input = match console.read_line(INPUT_PROMPT)? {
                Some(line) => TurnInput::parse(&line),
                None => TurnInput::Exit,
            };

            let outcome = match input {
                TurnInput::Exit => SessionOutcome::Exit,
                TurnInput::Reselect => SessionOutcome::Reselect,
                TurnInput::Blank => continue,
                TurnInput::Message(text) => {
                    self.turn(console, &text).await?;
                    continue;
                }
            };

            debug!(?outcome, "Session ended");
            self.state = SessionState::Ended(outcome);
            return Ok(outcome);
        }
    }

    /// Send one message to every selected assistant in order.
    pub async fn turn(&mut self, console: &mut dyn Console, text: &str) -> Result<()> {
        let thread_id = self.open().await?;

        for assistant in self.selection.assistants() {
            let name = assistant.display_name();

            self.api
                .create_message(&thread_id, text, self.file_ids)
                .await?;
            let run = self.api.create_run(&thread_id, &assistant.id).await?;
            debug!(run_id = %run.id, assistant = %name, "Run started");

            let outcome = await_run(self.api, &thread_id, &run.id, self.policy).await?;
            match outcome.state {
                PollState::Completed => {
                    let messages = self.api.list_messages(&thread_id).await?;
                    match reply_for_run(&messages, &run) {
                        Some(reply) => {
                            console.println("");
                            console.println(&format!("Response from '{}':", name));
                            console.println(&reply);
                        }
                        None => console.println(&format!(
                            "No response from the assistant '{}' or unable to retrieve the message.",
                            name
                        )),
                    }
                }
                PollState::Failed(status) => {
                    warn!(run_id = %run.id, assistant = %name, %status, "Run did not complete");
                    console.println(&format!(
                        "Run did not complete successfully for '{}'. Status: {}",
                        name, status
                    ));
                }
                PollState::GaveUp(_) | PollState::Pending => {
                    let status = outcome.run.status;
                    warn!(
                        run_id = %run.id,
                        assistant = %name,
                        %status,
                        waits = outcome.waits,
                        "Gave up waiting for run"
                    );
                    if let Err(e) = self.api.cancel_run(&thread_id, &run.id).await {
                        warn!(run_id = %run.id, error = %e, "Run cancellation failed");
                    }
                    console.println(&format!(
                        "Stopped waiting for '{}' after {} polls. Last status: {}",
                        name, outcome.waits, status
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Text of the most recent assistant message produced by `run`.
///
/// `messages` is oldest first. A message with no content parts counts as
/// no reply.
pub fn reply_for_run(messages: &[ThreadMessage], run: &Run) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::Assistant && m.run_id.as_deref() == Some(run.id.as_str()))
        .filter(|m| !m.content.is_empty())
        .map(ThreadMessage::text)
}
