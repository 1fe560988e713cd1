//! Ensemble CLI library.
//!
//! Argument parsing, the line-editing console and error mapping for the
//! `ensemble` binary.

pub mod cli;
pub mod console;
pub mod error;

pub use cli::Cli;
pub use console::RustylineConsole;
pub use error::{CliError, Result};
