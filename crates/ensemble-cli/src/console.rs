//! Line-editing console backed by rustyline.

use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tracing::debug;

use ensemble_orchestrator::{Console, ConsoleError};

/// Interactive console with persistent history.
pub struct RustylineConsole {
    editor: Editor<(), DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl RustylineConsole {
    /// Create a console, loading history from `history_path` when it exists.
    pub fn new(history_path: Option<PathBuf>) -> rustyline::Result<Self> {
        let config = Config::builder().auto_add_history(false).build();
        let mut editor = Editor::with_config(config)?;

        if let Some(path) = history_path.as_ref().filter(|p| p.exists()) {
            if let Err(e) = editor.load_history(path) {
                debug!(path = %path.display(), error = %e, "Failed to load history");
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl Console for RustylineConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ConsoleError> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(ConsoleError(e.to_string())),
            }
        }
    }

    fn println(&mut self, line: &str) {
        println!("{}", line);
    }
}

impl Drop for RustylineConsole {
    fn drop(&mut self) {
        let Some(path) = &self.history_path else {
            return;
        };
        if let Err(e) = ensemble_core::ensure_state_dir() {
            debug!(error = %e, "Failed to create state directory");
            return;
        }
        if let Err(e) = self.editor.save_history(path) {
            debug!(path = %path.display(), error = %e, "Failed to save history");
        }
    }
}
