//! Error types for the update workflow.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use deployer_client::ClientError;

/// Result type alias for workflow operations.
pub type RolloutResult<T> = Result<T, RolloutError>;

/// The workflow an error aborted, used in cardinality messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Update,
    Termination,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update => f.write_str("update"),
            Operation::Termination => f.write_str("termination"),
        }
    }
}

/// Errors that abort a deploy, update, or termination.
#[derive(Debug, Error)]
pub enum RolloutError {
    // ── Configuration ──────────────────────────────────────────────
    #[error("unspecified argument '{0}'")]
    UnspecifiedArgument(&'static str),

    #[error("both properties 'remote_filename' and 'local_filename' are unspecified")]
    MissingArtifact,

    #[error("properties 'remote_filename' and 'local_filename' are mutually exclusive")]
    ConflictingArtifact,

    #[error("artifact name \"{filename}\" has no jar id after its last '/'")]
    InvalidArtifactName { filename: String },

    // ── Target selection ───────────────────────────────────────────
    #[error("retrieving jobs failed: {0}")]
    RetrieveJobs(#[source] ClientError),

    #[error("no instance running for job name base \"{base}\". Aborting {operation}")]
    NoRunningInstance { base: String, operation: Operation },

    #[error("job name with base \"{base}\" has {count} instances running. Aborting {operation}")]
    AmbiguousTarget {
        base: String,
        count: usize,
        operation: Operation,
    },

    // ── Savepoint ──────────────────────────────────────────────────
    #[error("failed to create savepoint for job {job_id} due to error: {source}")]
    CreateSavepoint {
        job_id: String,
        #[source]
        source: ClientError,
    },

    /// The backoff budget ran out before the savepoint completed.
    #[error(
        "failed to create savepoint for job \"{job_id}\" within {} seconds",
        .budget.as_secs_f64()
    )]
    SavepointTimeout { job_id: String, budget: Duration },

    /// The savepoint completed without a usable location.
    #[error("savepoint creation failed for job \"{job_id}\": {cause}")]
    SavepointFailed { job_id: String, cause: String },

    // ── Deploy ─────────────────────────────────────────────────────
    #[error("failed to read artifact {path}: {source}")]
    ReadArtifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Upload and run failures, passed through unchanged.
    #[error(transparent)]
    Client(#[from] ClientError),

    // ── Termination ────────────────────────────────────────────────
    #[error("failed to cancel job {job_id} due to error: {source}")]
    CancelJob {
        job_id: String,
        #[source]
        source: ClientError,
    },
}

impl RolloutError {
    /// Whether the invocation itself was at fault rather than the cluster.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RolloutError::UnspecifiedArgument(_)
                | RolloutError::MissingArtifact
                | RolloutError::ConflictingArtifact
                | RolloutError::InvalidArtifactName { .. }
                | RolloutError::ReadArtifact { .. }
        )
    }
}
