//! Command-line interface definition using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use ensemble_core::{Backoff, PollPolicy, DEFAULT_ALLOW_LIST};

/// Ensemble - talk to several assistants on one shared thread
#[derive(Parser, Debug)]
#[command(name = "ensemble")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the allow-list of assistant ids
    #[arg(short, long, env = "ENSEMBLE_ALLOW_LIST", default_value = DEFAULT_ALLOW_LIST)]
    pub allow_list: PathBuf,

    /// Assistants API base URL (default: https://api.openai.com/v1)
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub api_base: Option<String>,

    /// Milliseconds between run status checks
    #[arg(long, env = "ENSEMBLE_POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Stop waiting for a run after this many checks (default: wait forever)
    #[arg(long, env = "ENSEMBLE_MAX_POLLS")]
    pub max_polls: Option<u32>,

    /// How the poll interval grows (constant, exponential)
    #[arg(long, env = "ENSEMBLE_BACKOFF", default_value = "constant")]
    pub backoff: Backoff,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Builds the run polling policy from the flags.
    pub fn poll_policy(&self) -> PollPolicy {
        let policy = PollPolicy::fixed(Duration::from_millis(self.poll_interval_ms))
            .with_backoff(self.backoff);
        match self.max_polls {
            Some(max) => policy.with_max_attempts(max),
            None => policy,
        }
    }
}
