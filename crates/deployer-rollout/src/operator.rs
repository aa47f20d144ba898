//! The operator that runs workflows against one control plane.

use std::time::Duration;

use deployer_client::{ArtifactSource, ControlPlane};
use deployer_core::BackoffPolicy;
use deployer_core::config::DEFAULT_SAVEPOINT_WAIT_SECS;

/// Runs deploy, update, and terminate workflows.
///
/// The control plane and artifact source are borrowed for the whole run
/// and only used sequentially.
pub struct Operator<'a> {
    pub(crate) client: &'a dyn ControlPlane,
    pub(crate) artifacts: &'a dyn ArtifactSource,
    pub(crate) savepoint_backoff: BackoffPolicy,
}

impl<'a> Operator<'a> {
    /// An operator that waits up to 60 seconds for savepoints.
    pub fn new(client: &'a dyn ControlPlane, artifacts: &'a dyn ArtifactSource) -> Self {
        Self {
            client,
            artifacts,
            savepoint_backoff: BackoffPolicy::default()
                .with_max_elapsed_time(Duration::from_secs(DEFAULT_SAVEPOINT_WAIT_SECS)),
        }
    }

    /// Replace the policy used while waiting for savepoints. Its
    /// `max_elapsed_time` is the wait budget.
    pub fn with_savepoint_backoff(mut self, policy: BackoffPolicy) -> Self {
        self.savepoint_backoff = policy;
        self
    }
}
