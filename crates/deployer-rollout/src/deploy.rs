//! Upload an artifact and start it.

use std::path::Path;

use tracing::info;

use deployer_core::{RunRequest, RunResult};

use crate::error::{RolloutError, RolloutResult};
use crate::operator::Operator;

/// What to deploy and how to start it.
///
/// Exactly one of `local_filename` and `remote_filename` must be set;
/// empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploySpec {
    /// Path of a local artifact to read and upload.
    pub local_filename: Option<String>,
    /// Name of an artifact already uploaded to the cluster.
    pub remote_filename: Option<String>,
    pub entry_class: Option<String>,
    pub parallelism: Option<u32>,
    pub program_args: Option<String>,
    /// Savepoint to restore state from.
    pub savepoint_path: Option<String>,
    pub allow_non_restored_state: bool,
}

impl DeploySpec {
    fn run_request(&self) -> RunRequest {
        RunRequest {
            entry_class: self.entry_class.clone(),
            parallelism: self.parallelism,
            program_args: self.program_args.clone(),
            savepoint_path: self.savepoint_path.clone(),
            allow_non_restored_state: self.allow_non_restored_state,
        }
    }
}

/// The run target for an artifact: everything after the last `/`.
pub fn jar_id(filename: &str) -> &str {
    filename
        .rsplit_once('/')
        .map_or(filename, |(_, last)| last)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// An artifact that passed validation. Local content is already in memory.
#[derive(Debug)]
pub(crate) enum Artifact {
    Local { path: String, content: Vec<u8> },
    Remote(String),
}

impl Operator<'_> {
    /// Upload (if local) and run an artifact. Upload and run failures are
    /// returned unchanged; nothing here retries.
    pub async fn deploy(&self, spec: &DeploySpec) -> RolloutResult<RunResult> {
        let artifact = self
            .prepare_artifact(&spec.local_filename, &spec.remote_filename)
            .await?;
        self.start(artifact, &spec.run_request()).await
    }

    /// Check that exactly one artifact is named and read it if it is local.
    /// Makes no control-plane calls.
    pub(crate) async fn prepare_artifact(
        &self,
        local: &Option<String>,
        remote: &Option<String>,
    ) -> RolloutResult<Artifact> {
        match (non_empty(local), non_empty(remote)) {
            (None, None) => Err(RolloutError::MissingArtifact),
            (Some(_), Some(_)) => Err(RolloutError::ConflictingArtifact),
            (None, Some(remote)) => {
                if jar_id(remote).is_empty() {
                    return Err(RolloutError::InvalidArtifactName {
                        filename: remote.to_string(),
                    });
                }
                Ok(Artifact::Remote(remote.to_string()))
            }
            (Some(local), None) => {
                let content = self.artifacts.read_artifact(local).await.map_err(|source| {
                    RolloutError::ReadArtifact {
                        path: local.to_string(),
                        source,
                    }
                })?;
                Ok(Artifact::Local {
                    path: local.to_string(),
                    content,
                })
            }
        }
    }

    /// Upload a prepared artifact if needed, then run it.
    pub(crate) async fn start(
        &self,
        artifact: Artifact,
        request: &RunRequest,
    ) -> RolloutResult<RunResult> {
        let filename = match artifact {
            Artifact::Remote(name) => name,
            Artifact::Local { path, content } => self.upload(&path, content).await?,
        };

        let jar_id = jar_id(&filename);
        if jar_id.is_empty() {
            return Err(RolloutError::InvalidArtifactName {
                filename: filename.clone(),
            });
        }
        info!(
            jar = jar_id,
            savepoint = request.savepoint_path.as_deref().unwrap_or("<none>"),
            "starting job"
        );
        let result = self.client.run_artifact(jar_id, request).await?;
        info!(jar = jar_id, job = %result.job_id, "job started");
        Ok(result)
    }

    async fn upload(&self, path: &str, content: Vec<u8>) -> RolloutResult<String> {
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path);
        info!(path, bytes = content.len(), "uploading artifact");

        let uploaded = self.client.upload_artifact(name, content).await?;
        info!(filename = %uploaded.filename, status = %uploaded.status, "artifact uploaded");
        Ok(uploaded.filename)
    }
}
