//! Cancel the running instance of a job.

use tracing::info;

use crate::error::{Operation, RolloutError, RolloutResult};
use crate::filter::single_running;
use crate::operator::Operator;

impl Operator<'_> {
    /// Cancel the single running job matching `job_name_base`, without
    /// taking a savepoint. Returns the cancelled job's ID.
    pub async fn terminate(&self, job_name_base: &str) -> RolloutResult<String> {
        if job_name_base.is_empty() {
            return Err(RolloutError::UnspecifiedArgument("job_name_base"));
        }

        let jobs = self
            .client
            .list_jobs()
            .await
            .map_err(RolloutError::RetrieveJobs)?;
        let target = single_running(&jobs, job_name_base, Operation::Termination)?;

        info!(base = job_name_base, job = %target.id, "cancelling job");
        self.client
            .cancel_job(&target.id)
            .await
            .map_err(|source| RolloutError::CancelJob {
                job_id: target.id.clone(),
                source,
            })?;

        Ok(target.id.clone())
    }
}
