//! Shared types used across the deployer crates.
//!
//! These mirror the parts of the engine's REST responses that the update
//! workflow depends on. Loosely-typed engine strings (job state, savepoint
//! phase) are modelled as closed enums with an `Unrecognized` variant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the engine assigns to a running job.
pub type JobId = String;

// ── Jobs ───────────────────────────────────────────────────────────

/// Lifecycle state of a job as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Created,
    Running,
    Failing,
    Failed,
    Cancelling,
    Canceled,
    Finished,
    Restarting,
    Suspended,
    Reconciling,
    /// A state this version of the deployer does not know about.
    Unrecognized(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Created => "CREATED",
            JobStatus::Running => "RUNNING",
            JobStatus::Failing => "FAILING",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelling => "CANCELLING",
            JobStatus::Canceled => "CANCELED",
            JobStatus::Finished => "FINISHED",
            JobStatus::Restarting => "RESTARTING",
            JobStatus::Suspended => "SUSPENDED",
            JobStatus::Reconciling => "RECONCILING",
            JobStatus::Unrecognized(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CREATED" => JobStatus::Created,
            "RUNNING" => JobStatus::Running,
            "FAILING" => JobStatus::Failing,
            "FAILED" => JobStatus::Failed,
            "CANCELLING" => JobStatus::Cancelling,
            "CANCELED" => JobStatus::Canceled,
            "FINISHED" => JobStatus::Finished,
            "RESTARTING" => JobStatus::Restarting,
            "SUSPENDED" => JobStatus::Suspended,
            "RECONCILING" => JobStatus::Reconciling,
            _ => JobStatus::Unrecognized(s),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        JobStatus::from(s.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a job fetched from the engine. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "jid")]
    pub id: JobId,
    pub name: String,
    #[serde(rename = "state")]
    pub status: JobStatus,
}

impl Job {
    pub fn new(id: &str, name: &str, status: impl Into<JobStatus>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status: status.into(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }
}

// ── Savepoints ─────────────────────────────────────────────────────

/// Opaque handle returned when a savepoint is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavepointHandle {
    #[serde(rename = "request-id")]
    pub request_id: String,
}

/// Phase of an asynchronous savepoint operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SavepointPhase {
    InProgress,
    Completed,
    Unrecognized(String),
}

impl SavepointPhase {
    pub fn as_str(&self) -> &str {
        match self {
            SavepointPhase::InProgress => "IN_PROGRESS",
            SavepointPhase::Completed => "COMPLETED",
            SavepointPhase::Unrecognized(s) => s,
        }
    }
}

impl From<String> for SavepointPhase {
    fn from(s: String) -> Self {
        match s.as_str() {
            "IN_PROGRESS" => SavepointPhase::InProgress,
            "COMPLETED" => SavepointPhase::Completed,
            _ => SavepointPhase::Unrecognized(s),
        }
    }
}

impl From<SavepointPhase> for String {
    fn from(phase: SavepointPhase) -> Self {
        phase.as_str().to_string()
    }
}

impl fmt::Display for SavepointPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of a savepoint request.
///
/// `location` is only meaningful once the phase is `Completed` and the
/// savepoint succeeded; `failure_cause` is set when it did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavepointStatus {
    pub phase: SavepointPhase,
    pub location: Option<String>,
    pub failure_cause: Option<String>,
}

impl SavepointStatus {
    pub fn in_progress() -> Self {
        Self {
            phase: SavepointPhase::InProgress,
            location: None,
            failure_cause: None,
        }
    }

    pub fn completed(location: &str) -> Self {
        Self {
            phase: SavepointPhase::Completed,
            location: Some(location.to_string()),
            failure_cause: None,
        }
    }

    pub fn failed(cause: &str) -> Self {
        Self {
            phase: SavepointPhase::Completed,
            location: None,
            failure_cause: Some(cause.to_string()),
        }
    }

    /// The savepoint location, if the engine reported a non-empty one.
    pub fn usable_location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }
}

// ── Artifacts ──────────────────────────────────────────────────────

/// Response to an artifact upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedArtifact {
    /// Server-side filename, not necessarily the local file's name.
    pub filename: String,
    pub status: String,
}

/// Everything needed to start an uploaded artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub entry_class: Option<String>,
    pub parallelism: Option<u32>,
    pub program_args: Option<String>,
    pub savepoint_path: Option<String>,
    pub allow_non_restored_state: bool,
}

/// Response to a run request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(rename = "jobid")]
    pub job_id: JobId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_parses_known_and_unknown() {
        assert_eq!(JobStatus::from("RUNNING"), JobStatus::Running);
        assert_eq!(JobStatus::from("CANCELED"), JobStatus::Canceled);
        assert_eq!(
            JobStatus::from("MIGRATING"),
            JobStatus::Unrecognized("MIGRATING".to_string())
        );
        assert_eq!(JobStatus::from("MIGRATING").to_string(), "MIGRATING");
    }

    #[test]
    fn job_deserializes_from_overview_entry() {
        let json = r#"{"jid":"a1b2","name":"WordCount v1","state":"RUNNING","duration":42}"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job, Job::new("a1b2", "WordCount v1", JobStatus::Running));
        assert!(job.is_running());
    }

    #[test]
    fn savepoint_phase_unrecognized_is_distinct() {
        let phase: SavepointPhase = serde_json::from_str(r#""EXPLODED""#).unwrap();
        assert_eq!(phase, SavepointPhase::Unrecognized("EXPLODED".to_string()));
        assert_ne!(phase, SavepointPhase::InProgress);
    }

    #[test]
    fn usable_location_rejects_empty() {
        let mut status = SavepointStatus::completed("");
        assert_eq!(status.usable_location(), None);
        status.location = Some("s3://cp/1".to_string());
        assert_eq!(status.usable_location(), Some("s3://cp/1"));
        assert_eq!(SavepointStatus::failed("boom").usable_location(), None);
    }
}
