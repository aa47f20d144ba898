//! The update workflow: savepoint the running job, then redeploy from it.

use tracing::{info, warn};

use deployer_core::{RunRequest, RunResult};

use crate::error::{Operation, RolloutError, RolloutResult};
use crate::filter::single_running;
use crate::operator::Operator;

/// Parameters for replacing a running job with a new artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Name prefix that identifies the job across versions.
    pub job_name_base: String,
    pub local_filename: Option<String>,
    pub remote_filename: Option<String>,
    pub entry_class: Option<String>,
    pub parallelism: Option<u32>,
    pub program_args: Option<String>,
    /// Where to write the savepoint; cluster default when unset.
    pub savepoint_dir: Option<String>,
    pub allow_non_restored_state: bool,
}

impl UpdateRequest {
    fn run_request(&self, savepoint_path: &str) -> RunRequest {
        RunRequest {
            entry_class: self.entry_class.clone(),
            parallelism: self.parallelism,
            program_args: self.program_args.clone(),
            savepoint_path: Some(savepoint_path.to_string()),
            allow_non_restored_state: self.allow_non_restored_state,
        }
    }
}

impl Operator<'_> {
    /// Replace the single running job matching `job_name_base`.
    ///
    /// Steps: check the arguments and read the artifact, list jobs, pick
    /// exactly one running match, take a savepoint that cancels it, wait
    /// for the savepoint, then start the new artifact from it. Any failure
    /// stops the sequence; nothing is rolled back.
    pub async fn update(&self, request: &UpdateRequest) -> RolloutResult<RunResult> {
        if request.job_name_base.is_empty() {
            return Err(RolloutError::UnspecifiedArgument("job_name_base"));
        }
        // The savepoint cancels the old job, so the artifact must be usable first.
        let artifact = self
            .prepare_artifact(&request.local_filename, &request.remote_filename)
            .await?;

        info!(base = %request.job_name_base, "starting job update");

        let jobs = self
            .client
            .list_jobs()
            .await
            .map_err(RolloutError::RetrieveJobs)?;

        let target = single_running(&jobs, &request.job_name_base, Operation::Update)?;
        info!(
            base = %request.job_name_base,
            job = %target.id,
            name = %target.name,
            "found exactly 1 running job"
        );

        let handle = self
            .request_savepoint(&target.id, request.savepoint_dir.as_deref())
            .await?;
        let status = self
            .await_savepoint(&target.id, handle, self.savepoint_backoff.max_elapsed_time)
            .await?;

        // COMPLETED can still mean the savepoint failed.
        let Some(location) = status.usable_location() else {
            return Err(RolloutError::SavepointFailed {
                job_id: target.id.clone(),
                cause: status
                    .failure_cause
                    .clone()
                    .unwrap_or_else(|| "no savepoint location was reported".to_string()),
            });
        };
        info!(job = %target.id, savepoint = location, "created savepoint");

        match self.start(artifact, &request.run_request(location)).await {
            Ok(result) => {
                info!(
                    base = %request.job_name_base,
                    old_job = %target.id,
                    new_job = %result.job_id,
                    "job update completed"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(
                    job = %target.id,
                    savepoint = location,
                    error = %err,
                    "deploy failed after the old job was cancelled; no instance is running. \
                     Redeploy manually from the savepoint"
                );
                Err(err)
            }
        }
    }
}
