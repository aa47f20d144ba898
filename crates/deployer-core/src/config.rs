//! deployer.toml configuration parser.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backoff::BackoffPolicy;

/// Default time budget for a savepoint to complete.
pub const DEFAULT_SAVEPOINT_WAIT_SECS: u64 = 60;

/// Default per-request timeout against the control plane.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployerConfig {
    pub cluster: ClusterConfig,
    pub savepoint: SavepointConfig,
    pub backoff: BackoffConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavepointConfig {
    /// Target directory; the cluster default is used when unset.
    pub directory: Option<String>,
    pub wait_secs: u64,
}

impl Default for SavepointConfig {
    fn default() -> Self {
        Self {
            directory: None,
            wait_secs: DEFAULT_SAVEPOINT_WAIT_SECS,
        }
    }
}

/// Backoff tuning for savepoint polling. The total budget comes from
/// `savepoint.wait_secs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub initial_interval_ms: u64,
    pub multiplier: f64,
    pub randomization_factor: f64,
    pub max_interval_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        let policy = BackoffPolicy::default();
        Self {
            initial_interval_ms: policy.initial_interval.as_millis() as u64,
            multiplier: policy.multiplier,
            randomization_factor: policy.randomization_factor,
            max_interval_ms: policy.max_interval.as_millis() as u64,
        }
    }
}

impl DeployerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// Rejects backoff tuning that cannot produce a finite delay.
    pub fn validate(&self) -> Result<(), String> {
        let backoff = &self.backoff;
        if !backoff.multiplier.is_finite() || backoff.multiplier < 1.0 {
            return Err(format!(
                "backoff.multiplier must be a finite number of at least 1, got {}",
                backoff.multiplier
            ));
        }
        if !(0.0..=1.0).contains(&backoff.randomization_factor) {
            return Err(format!(
                "backoff.randomization_factor must be between 0 and 1, got {}",
                backoff.randomization_factor
            ));
        }
        Ok(())
    }

    /// Policy used while waiting for a savepoint.
    pub fn savepoint_backoff(&self) -> BackoffPolicy {
        BackoffPolicy {
            initial_interval: Duration::from_millis(self.backoff.initial_interval_ms),
            multiplier: self.backoff.multiplier,
            randomization_factor: self.backoff.randomization_factor,
            max_interval: Duration::from_millis(self.backoff.max_interval_ms),
            max_elapsed_time: Duration::from_secs(self.savepoint.wait_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.cluster.request_timeout_secs)
    }
}
