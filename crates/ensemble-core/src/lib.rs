//! Ensemble Core - shared configuration for all Ensemble crates.
//!
//! - **config**: State directory, environment files and default paths
//! - **poll**: Polling policy for remote jobs

pub mod config;
pub mod poll;

pub use config::{
    default_allow_list, ensure_state_dir, env_file, history_file, load_env, state_dir,
    ALLOW_LIST_ENV, DEFAULT_ALLOW_LIST, STATE_DIR_ENV,
};
pub use poll::{Backoff, ParseBackoffError, PollPolicy, PollSchedule, DEFAULT_POLL_INTERVAL};
