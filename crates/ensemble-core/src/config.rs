//! Shared configuration for Ensemble.
//!
//! Locates the state directory and the files Ensemble reads at startup.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.ensemble/
//! ├── .env.local    # Secrets (OPENAI_API_KEY)
//! └── history.txt   # Line editor history
//! ```
//!
//! # Environment Variables
//!
//! - `ENSEMBLE_STATE_DIR`: Override the base state directory
//! - `ENSEMBLE_ALLOW_LIST`: Path of the allowed assistants file

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "ENSEMBLE_STATE_DIR";

/// Environment variable for the allow-list path.
pub const ALLOW_LIST_ENV: &str = "ENSEMBLE_ALLOW_LIST";

/// Default allow-list file, resolved against the working directory.
pub const DEFAULT_ALLOW_LIST: &str = "allowed_assistants.json";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".ensemble";

const ENV_FILE: &str = ".env.local";
const HISTORY_FILE: &str = "history.txt";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Ensemble state directory.
///
/// The state directory is determined by:
/// 1. `ENSEMBLE_STATE_DIR` environment variable if set
/// 2. `~/.ensemble` if home directory is available
/// 3. `.ensemble` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the `.env.local` file path inside the state directory.
pub fn env_file() -> PathBuf {
    state_dir().join(ENV_FILE)
}

/// Get the line editor history file path.
pub fn history_file() -> PathBuf {
    state_dir().join(HISTORY_FILE)
}

/// Default allow-list path, honouring `ENSEMBLE_ALLOW_LIST`.
pub fn default_allow_list() -> PathBuf {
    std::env::var(ALLOW_LIST_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ALLOW_LIST))
}

/// Ensure the state directory exists, creating it if necessary.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_state_dir() -> std::io::Result<()> {
    let dir = state_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

/// Load environment files.
///
/// `.env.local` in the working directory is read first, then the one in the
/// state directory. Variables already set are never overridden.
pub fn load_env() {
    load_env_from(Path::new(ENV_FILE));
    load_env_from(&env_file());
}

fn load_env_from(path: &Path) {
    if path.exists() {
        match dotenvy::from_path(path) {
            Ok(()) => debug!(path = %path.display(), "Loaded environment file"),
            Err(e) => debug!(path = %path.display(), error = %e, "Skipping environment file"),
        }
    }
}
