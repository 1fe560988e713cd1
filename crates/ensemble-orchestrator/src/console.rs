//! Line-oriented console abstraction.
//!
//! The process owns exactly one console. It is handed by `&mut` reference to
//! whichever component is currently driving the interaction.

use thiserror::Error;

/// Console failures other than end of input.
#[derive(Debug, Error)]
#[error("console failure: {0}")]
pub struct ConsoleError(pub String);

/// A line-oriented input/output surface.
pub trait Console {
    /// Prompt for one line. Returns `Ok(None)` once input is closed.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ConsoleError>;

    /// Print one line (a trailing newline is added).
    fn println(&mut self, line: &str);
}
