//! Polling policy for remote jobs.
//!
//! A [`PollPolicy`] describes how long to wait between status checks and
//! when to give up. A [`PollSchedule`] is the per-job cursor through that
//! policy: each call to [`PollSchedule::next_delay`] yields the next wait, or
//! `None` once the attempt budget is spent.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default interval between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How the wait grows between consecutive polls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Backoff {
    /// Same interval every time.
    #[default]
    Constant,
    /// Multiply the interval by `factor` after each wait, capped at `max_interval`.
    Exponential {
        factor: u32,
        max_interval: Duration,
    },
}

impl fmt::Display for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Exponential { .. } => write!(f, "exponential"),
        }
    }
}

/// Error returned when a backoff name is not recognised.
#[derive(Debug, Error, PartialEq)]
#[error("unknown backoff strategy: {0} (expected 'constant' or 'exponential')")]
pub struct ParseBackoffError(String);

impl FromStr for Backoff {
    type Err = ParseBackoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "constant" | "fixed" => Ok(Self::Constant),
            "exponential" | "exp" => Ok(Self::Exponential {
                factor: 2,
                max_interval: Duration::from_secs(30),
            }),
            other => Err(ParseBackoffError(other.to_string())),
        }
    }
}

/// Polling policy: interval, attempt budget and backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// First wait between status checks.
    pub interval: Duration,
    /// Maximum number of waits before giving up. `None` polls forever.
    pub max_attempts: Option<u32>,
    /// Growth of the interval between waits.
    pub backoff: Backoff,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            backoff: Backoff::Constant,
        }
    }
}

impl PollPolicy {
    /// Fixed interval, unbounded.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Zero-wait policy for tests.
    pub fn immediate() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Limit the number of waits.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the backoff strategy.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Start a fresh schedule for one job.
    pub fn schedule(&self) -> PollSchedule {
        PollSchedule {
            policy: self.clone(),
            current: self.interval,
            waits: 0,
        }
    }
}

/// Per-job cursor through a [`PollPolicy`].
#[derive(Debug, Clone)]
pub struct PollSchedule {
    policy: PollPolicy,
    current: Duration,
    waits: u32,
}

impl PollSchedule {
    /// Returns the next wait, or `None` when the attempt budget is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if let Some(max) = self.policy.max_attempts {
            if self.waits >= max {
                return None;
            }
        }

        let delay = self.current;
        self.waits += 1;

        if let Backoff::Exponential {
            factor,
            max_interval,
        } = self.policy.backoff
        {
            self.current = self
                .current
                .saturating_mul(factor.max(1))
                .min(max_interval);
        }

        Some(delay)
    }

    /// Number of waits handed out so far.
    pub fn waits(&self) -> u32 {
        self.waits
    }
}
