//! reqwest-backed client for the engine's REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use deployer_core::{
    Job, RunRequest, RunResult, SavepointHandle, SavepointPhase, SavepointStatus,
    UploadedArtifact,
};

use crate::ControlPlane;
use crate::error::{ClientError, ClientResult};

const JAR_CONTENT_TYPE: &str = "application/x-java-archive";

/// Talks to a single cluster's REST endpoint.
#[derive(Debug, Clone)]
pub struct RestClient {
    inner: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl RestClient {
    /// Builds a client for `base_url`. A non-empty `api_token` is sent as a
    /// bearer token on every request.
    pub fn new(base_url: &str, api_token: Option<String>, timeout: Duration) -> ClientResult<Self> {
        // Url::join replaces the last segment unless the base ends in '/'.
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let inner = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner,
            base_url,
            api_token: api_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "control-plane request");
        let req = self.inner.request(method, url);
        Ok(match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    /// Sends the request and returns the body if the status is `expected`.
    async fn send_request(&self, req: RequestBuilder, expected: StatusCode) -> ClientResult<String> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;

        if status != expected {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: String) -> ClientResult<T> {
    serde_json::from_str(&body).map_err(|_| ClientError::Decode { body })
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct JobsOverview {
    jobs: Vec<Job>,
}

#[derive(Serialize)]
struct SavepointTrigger<'a> {
    #[serde(rename = "target-directory", skip_serializing_if = "Option::is_none")]
    target_directory: Option<&'a str>,
    #[serde(rename = "cancel-job")]
    cancel_job: bool,
}

#[derive(Deserialize)]
struct SavepointStatusResponse {
    status: SavepointStatusId,
    #[serde(default)]
    operation: Option<SavepointOperation>,
}

#[derive(Deserialize)]
struct SavepointStatusId {
    id: SavepointPhase,
}

#[derive(Deserialize)]
struct SavepointOperation {
    #[serde(default)]
    location: Option<String>,
    #[serde(rename = "failure-cause", default)]
    failure_cause: Option<serde_json::Value>,
}

impl From<SavepointStatusResponse> for SavepointStatus {
    fn from(res: SavepointStatusResponse) -> Self {
        let (location, failure_cause) = match res.operation {
            Some(op) => (op.location, op.failure_cause.and_then(describe_failure)),
            None => (None, None),
        };
        SavepointStatus {
            phase: res.status.id,
            location,
            failure_cause,
        }
    }
}

/// Renders a failure cause, which the engine reports either as a plain
/// string or as a serialized exception object.
fn describe_failure(cause: serde_json::Value) -> Option<String> {
    match cause {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Object(obj) => {
            if let Some(trace) = obj.get("stack-trace").and_then(|t| t.as_str()) {
                return trace.lines().next().map(str::to_string);
            }
            if let Some(class) = obj.get("class").and_then(|c| c.as_str()) {
                return Some(class.to_string());
            }
            Some(serde_json::Value::Object(obj).to_string())
        }
        other => Some(other.to_string()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    entry_class: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parallelism: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    program_args: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    savepoint_path: Option<&'a str>,
    allow_non_restored_state: bool,
}

impl<'a> From<&'a RunRequest> for RunBody<'a> {
    fn from(req: &'a RunRequest) -> Self {
        Self {
            entry_class: req.entry_class.as_deref().filter(|s| !s.is_empty()),
            parallelism: req.parallelism,
            program_args: req.program_args.as_deref().filter(|s| !s.is_empty()),
            savepoint_path: req.savepoint_path.as_deref().filter(|s| !s.is_empty()),
            allow_non_restored_state: req.allow_non_restored_state,
        }
    }
}

// ── ControlPlane ───────────────────────────────────────────────────

#[async_trait]
impl ControlPlane for RestClient {
    async fn list_jobs(&self) -> ClientResult<Vec<Job>> {
        let req = self.build_request(Method::GET, "jobs/overview")?;
        let body = self.send_request(req, StatusCode::OK).await?;
        let overview: JobsOverview = decode(body)?;
        Ok(overview.jobs)
    }

    async fn upload_artifact(
        &self,
        filename: &str,
        content: Vec<u8>,
    ) -> ClientResult<UploadedArtifact> {
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str(JAR_CONTENT_TYPE)?;
        let form = reqwest::multipart::Form::new().part("jarfile", part);

        let req = self.build_request(Method::POST, "jars/upload")?.multipart(form);
        let body = self.send_request(req, StatusCode::OK).await?;
        decode(body)
    }

    async fn run_artifact(&self, jar_id: &str, request: &RunRequest) -> ClientResult<RunResult> {
        let req = self
            .build_request(Method::POST, &format!("jars/{jar_id}/run"))?
            .json(&RunBody::from(request));
        let body = self.send_request(req, StatusCode::OK).await?;
        decode(body)
    }

    async fn create_savepoint(
        &self,
        job_id: &str,
        target_directory: Option<&str>,
    ) -> ClientResult<SavepointHandle> {
        // The field must be omitted, not sent empty, to get the cluster default.
        let trigger = SavepointTrigger {
            target_directory: target_directory.filter(|d| !d.is_empty()),
            cancel_job: true,
        };
        let req = self
            .build_request(Method::POST, &format!("jobs/{job_id}/savepoints"))?
            .json(&trigger);
        let body = self.send_request(req, StatusCode::ACCEPTED).await?;
        decode(body)
    }

    async fn savepoint_status(
        &self,
        job_id: &str,
        request_id: &str,
    ) -> ClientResult<SavepointStatus> {
        let req =
            self.build_request(Method::GET, &format!("jobs/{job_id}/savepoints/{request_id}"))?;
        let body = self.send_request(req, StatusCode::OK).await?;
        let res: SavepointStatusResponse = decode(body)?;
        Ok(res.into())
    }

    async fn cancel_job(&self, job_id: &str) -> ClientResult<()> {
        let req = self
            .build_request(Method::PATCH, &format!("jobs/{job_id}"))?
            .query(&[("mode", "cancel")]);
        self.send_request(req, StatusCode::ACCEPTED).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client =
            RestClient::new("http://jobmanager:8081/flink", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url().as_str(), "http://jobmanager:8081/flink/");
        assert_eq!(
            client.base_url().join("jobs/overview").unwrap().as_str(),
            "http://jobmanager:8081/flink/jobs/overview"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = RestClient::new("not a url", None, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::Url(_)));
    }

    #[test]
    fn savepoint_trigger_omits_missing_directory() {
        let json = serde_json::to_value(SavepointTrigger {
            target_directory: None,
            cancel_job: true,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "cancel-job": true }));
    }

    #[test]
    fn status_response_in_progress_has_no_operation() {
        let res: SavepointStatusResponse =
            serde_json::from_str(r#"{"status":{"id":"IN_PROGRESS"}}"#).unwrap();
        assert_eq!(SavepointStatus::from(res), SavepointStatus::in_progress());
    }

    #[test]
    fn status_response_renders_structured_failure() {
        let json = r#"{
            "status": {"id": "COMPLETED"},
            "operation": {
                "failure-cause": {
                    "class": "java.util.concurrent.CompletionException",
                    "stack-trace": "java.util.concurrent.CompletionException: checkpoint declined\n\tat ..."
                }
            }
        }"#;
        let res: SavepointStatusResponse = serde_json::from_str(json).unwrap();
        let status = SavepointStatus::from(res);
        assert_eq!(status.phase, SavepointPhase::Completed);
        assert_eq!(status.location, None);
        assert_eq!(
            status.failure_cause.as_deref(),
            Some("java.util.concurrent.CompletionException: checkpoint declined")
        );
    }

    #[test]
    fn run_body_skips_empty_optionals() {
        let req = RunRequest {
            entry_class: Some(String::new()),
            parallelism: Some(2),
            program_args: None,
            savepoint_path: Some("s3://cp/1".to_string()),
            allow_non_restored_state: true,
        };
        let json = serde_json::to_value(RunBody::from(&req)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "parallelism": 2,
                "savepointPath": "s3://cp/1",
                "allowNonRestoredState": true,
            })
        );
    }
}
