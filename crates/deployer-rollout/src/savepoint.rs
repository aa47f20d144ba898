//! Savepoint creation and completion polling.

use std::time::Duration;

use tracing::{debug, info, warn};

use deployer_core::{SavepointHandle, SavepointPhase, SavepointStatus};

use crate::backoff::{self, Attempt, BackoffError};
use crate::error::{RolloutError, RolloutResult};
use crate::operator::Operator;

impl Operator<'_> {
    /// Ask the control plane to take a savepoint of `job_id` and cancel it.
    /// An empty or missing directory selects the cluster default.
    pub async fn request_savepoint(
        &self,
        job_id: &str,
        target_directory: Option<&str>,
    ) -> RolloutResult<SavepointHandle> {
        let target_directory = target_directory.filter(|d| !d.is_empty());
        info!(job = job_id, directory = ?target_directory, "creating savepoint");

        self.client
            .create_savepoint(job_id, target_directory)
            .await
            .map_err(|source| RolloutError::CreateSavepoint {
                job_id: job_id.to_string(),
                source,
            })
    }

    /// Poll until the savepoint behind `handle` reports `COMPLETED`, giving
    /// up after `max_elapsed`.
    ///
    /// A completed status is returned as-is, even if it carries a failure
    /// cause. In-progress states, unrecognized phases, and failed status
    /// requests are all retried.
    pub async fn await_savepoint(
        &self,
        job_id: &str,
        handle: SavepointHandle,
        max_elapsed: Duration,
    ) -> RolloutResult<SavepointStatus> {
        let policy = self.savepoint_backoff.clone().with_max_elapsed_time(max_elapsed);
        let request_id = handle.request_id.as_str();

        let result = backoff::retry(&policy, |attempt| async move {
            debug!(job = job_id, attempt, "checking status of savepoint creation");
            match self.client.savepoint_status(job_id, request_id).await {
                Err(err) => Attempt::Retry(format!(
                    "savepoint status for job \"{job_id}\" unavailable: {err}"
                )),
                Ok(status) => match status.phase.clone() {
                    SavepointPhase::Completed => Attempt::Ready(status),
                    SavepointPhase::InProgress => Attempt::Retry(format!(
                        "savepoint creation for job \"{job_id}\" is still pending"
                    )),
                    SavepointPhase::Unrecognized(phase) => {
                        // Retried like IN_PROGRESS; a broken status endpoint only
                        // surfaces once the budget runs out.
                        warn!(job = job_id, phase = %phase, "unrecognized savepoint status");
                        Attempt::Retry(format!(
                            "savepoint creation for job \"{job_id}\" returned an unknown status \"{phase}\""
                        ))
                    }
                },
            }
        })
        .await;

        match result {
            Ok(status) => Ok(status),
            Err(BackoffError::Exhausted { .. }) => Err(RolloutError::SavepointTimeout {
                job_id: job_id.to_string(),
                budget: max_elapsed,
            }),
            // Every status outcome above is retried, so nothing aborts early
            // today. Unrecognized phases would land here if they became fatal.
            Err(BackoffError::Fatal(cause)) => Err(RolloutError::SavepointFailed {
                job_id: job_id.to_string(),
                cause,
            }),
        }
    }
}
