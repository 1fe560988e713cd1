//! Run completion poller.
//!
//! Drives one run to a terminal status under a [`PollPolicy`]. The only side
//! effect besides waiting is the status query itself.

use tracing::{debug, trace};

use ensemble_assistants::{AssistantsApi, Result, Run, RunStatus};
use ensemble_core::PollPolicy;

/// Where a polled run ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// Still queued or running.
    Pending,
    /// Finished successfully.
    Completed,
    /// Finished without completing.
    Failed(RunStatus),
    /// The policy's attempt budget ran out while the run was still pending.
    GaveUp(RunStatus),
}

impl PollState {
    /// Classify an observed status.
    pub fn from_status(status: RunStatus) -> Self {
        if status.is_completed() {
            Self::Completed
        } else if status.is_terminal() {
            Self::Failed(status)
        } else {
            Self::Pending
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Final observation of a run.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub state: PollState,
    /// Last fetched run.
    pub run: Run,
    /// Number of waits between fetches.
    pub waits: u32,
}

/// Poll `run_id` until it reaches a terminal status or the policy gives up.
pub async fn await_run(
    api: &dyn AssistantsApi,
    thread_id: &str,
    run_id: &str,
    policy: &PollPolicy,
) -> Result<PollOutcome> {
    let mut schedule = policy.schedule();
    let mut run = api.retrieve_run(thread_id, run_id).await?;
    let mut state = PollState::from_status(run.status);

    while state.is_pending() {
        let Some(delay) = schedule.next_delay() else {
            debug!(run_id, status = %run.status, waits = schedule.waits(), "Poll budget exhausted");
            state = PollState::GaveUp(run.status);
            break;
        };

        trace!(run_id, status = %run.status, ?delay, "Run pending");
        tokio::time::sleep(delay).await;

        run = api.retrieve_run(thread_id, run_id).await?;
        state = PollState::from_status(run.status);
    }

    debug!(run_id, status = %run.status, waits = schedule.waits(), "Run settled");
    Ok(PollOutcome {
        state,
        run,
        waits: schedule.waits(),
    })
}
