//! Target selection among the cluster's jobs.

use deployer_core::Job;

use crate::error::{Operation, RolloutError, RolloutResult};

/// Jobs that are running and whose name starts with `name_base`, in their
/// original order. An empty base matches every running job.
pub fn running_with_name_base<'a>(jobs: &'a [Job], name_base: &str) -> Vec<&'a Job> {
    jobs.iter()
        .filter(|job| job.is_running() && job.name.starts_with(name_base))
        .collect()
}

/// The single running job for `name_base`. Zero or several candidates
/// abort `operation`.
pub fn single_running<'a>(
    jobs: &'a [Job],
    name_base: &str,
    operation: Operation,
) -> RolloutResult<&'a Job> {
    let candidates = running_with_name_base(jobs, name_base);
    match candidates.as_slice() {
        [] => Err(RolloutError::NoRunningInstance {
            base: name_base.to_string(),
            operation,
        }),
        [job] => Ok(*job),
        many => Err(RolloutError::AmbiguousTarget {
            base: name_base.to_string(),
            count: many.len(),
            operation,
        }),
    }
}
