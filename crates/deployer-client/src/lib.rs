//! Control-plane client for the Flink deployer.
//!
//! The update workflow talks to the engine exclusively through the
//! [`ControlPlane`] trait and reads program files through
//! [`ArtifactSource`]. Both are injected, so tests swap in doubles that
//! implement the same traits.
//!
//! # Components
//!
//! - **`rest`** — reqwest-backed [`ControlPlane`] for the engine's REST API
//! - **`artifact`** — local-filesystem and in-memory artifact sources
//! - **`error`** — transport and remote-status errors

pub mod artifact;
pub mod error;
pub mod rest;

use async_trait::async_trait;

use deployer_core::{
    Job, RunRequest, RunResult, SavepointHandle, SavepointStatus, UploadedArtifact,
};

pub use artifact::{ArtifactSource, InMemoryArtifacts, LocalArtifacts};
pub use error::{ClientError, ClientResult};
pub use rest::RestClient;

/// Operations the deployer needs from the engine's control plane.
///
/// Implementations must be safe for sequential reuse across a whole run.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Fetch every job the cluster knows about.
    async fn list_jobs(&self) -> ClientResult<Vec<Job>>;

    /// Upload a program artifact. The returned filename is the server-side
    /// identifier and may differ from `filename`.
    async fn upload_artifact(&self, filename: &str, content: Vec<u8>)
    -> ClientResult<UploadedArtifact>;

    /// Start a previously uploaded artifact.
    async fn run_artifact(&self, jar_id: &str, request: &RunRequest) -> ClientResult<RunResult>;

    /// Trigger a savepoint that cancels the job once taken. With no target
    /// directory the cluster default is used.
    async fn create_savepoint(
        &self,
        job_id: &str,
        target_directory: Option<&str>,
    ) -> ClientResult<SavepointHandle>;

    /// Fetch the current state of a savepoint request.
    async fn savepoint_status(&self, job_id: &str, request_id: &str)
    -> ClientResult<SavepointStatus>;

    /// Cancel a running job.
    async fn cancel_job(&self, job_id: &str) -> ClientResult<()>;
}
