//! Recording control-plane double for workflow tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use deployer_client::{ClientError, ClientResult, ControlPlane};
use deployer_core::{
    Job, RunRequest, RunResult, SavepointHandle, SavepointStatus, UploadedArtifact,
};

/// Control-plane operations, for scripting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListJobs,
    Upload,
    Run,
    CreateSavepoint,
    Cancel,
}

/// A call the fake received, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListJobs,
    Upload { filename: String, content: Vec<u8> },
    Run { jar_id: String, request: RunRequest },
    CreateSavepoint { job_id: String, target_directory: Option<String> },
    SavepointStatus { job_id: String, request_id: String },
    Cancel { job_id: String },
}

/// Scripted reply to a status poll.
#[derive(Debug, Clone)]
pub enum StatusReply {
    Status(SavepointStatus),
    Unavailable,
}

pub struct FakeControlPlane {
    jobs: Vec<Job>,
    failing: HashSet<Op>,
    uploaded_filename: String,
    /// Replies are consumed in order; the last one repeats.
    statuses: Mutex<VecDeque<StatusReply>>,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeControlPlane {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            failing: HashSet::new(),
            uploaded_filename: "/data/flink/sample.jar".to_string(),
            statuses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(mut self, jobs: Vec<Job>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn failing(mut self, op: Op) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn with_uploaded_filename(mut self, filename: &str) -> Self {
        self.uploaded_filename = filename.to_string();
        self
    }

    pub fn with_statuses(self, replies: Vec<StatusReply>) -> Self {
        *self.statuses.lock().unwrap() = replies.into();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_polls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::SavepointStatus { .. }))
            .count()
    }

    pub fn run_calls(&self) -> Vec<(String, RunRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Run { jar_id, request } => Some((jar_id, request)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: Op) -> ClientResult<()> {
        if self.failing.contains(&op) {
            return Err(failed());
        }
        Ok(())
    }
}

pub fn failed() -> ClientError {
    ClientError::UnexpectedStatus {
        status: 500,
        body: "failed".to_string(),
    }
}

#[async_trait]
impl ControlPlane for FakeControlPlane {
    async fn list_jobs(&self) -> ClientResult<Vec<Job>> {
        self.record(Call::ListJobs);
        self.check(Op::ListJobs)?;
        Ok(self.jobs.clone())
    }

    async fn upload_artifact(
        &self,
        filename: &str,
        content: Vec<u8>,
    ) -> ClientResult<UploadedArtifact> {
        self.record(Call::Upload {
            filename: filename.to_string(),
            content,
        });
        self.check(Op::Upload)?;
        Ok(UploadedArtifact {
            filename: self.uploaded_filename.clone(),
            status: "success".to_string(),
        })
    }

    async fn run_artifact(&self, jar_id: &str, request: &RunRequest) -> ClientResult<RunResult> {
        self.record(Call::Run {
            jar_id: jar_id.to_string(),
            request: request.clone(),
        });
        self.check(Op::Run)?;
        Ok(RunResult {
            job_id: "job-new".to_string(),
        })
    }

    async fn create_savepoint(
        &self,
        job_id: &str,
        target_directory: Option<&str>,
    ) -> ClientResult<SavepointHandle> {
        self.record(Call::CreateSavepoint {
            job_id: job_id.to_string(),
            target_directory: target_directory.map(str::to_string),
        });
        self.check(Op::CreateSavepoint)?;
        Ok(SavepointHandle {
            request_id: "request-id".to_string(),
        })
    }

    async fn savepoint_status(
        &self,
        job_id: &str,
        request_id: &str,
    ) -> ClientResult<SavepointStatus> {
        self.record(Call::SavepointStatus {
            job_id: job_id.to_string(),
            request_id: request_id.to_string(),
        });
        let reply = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().cloned()
            }
        };
        match reply {
            Some(StatusReply::Status(status)) => Ok(status),
            Some(StatusReply::Unavailable) => Err(ClientError::UnexpectedStatus {
                status: 503,
                body: "unavailable".to_string(),
            }),
            None => Ok(SavepointStatus::in_progress()),
        }
    }

    async fn cancel_job(&self, job_id: &str) -> ClientResult<()> {
        self.record(Call::Cancel {
            job_id: job_id.to_string(),
        });
        self.check(Op::Cancel)
    }
}
