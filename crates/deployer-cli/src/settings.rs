//! Resolves connection settings from flags, environment, and deployer.toml.
//!
//! Flags and environment variables are merged by clap before they reach
//! here; this layer falls back to the config file, then to defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use deployer_core::{BackoffPolicy, DeployerConfig};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub api_token: Option<String>,
    pub config: DeployerConfig,
}

impl Settings {
    pub fn resolve(
        config_path: Option<&Path>,
        base_url: Option<String>,
        api_token: Option<String>,
    ) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => DeployerConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => DeployerConfig::default(),
        };

        let base_url = base_url
            .or_else(|| config.cluster.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_token = api_token
            .or_else(|| config.cluster.api_token.clone())
            .filter(|t| !t.is_empty());

        Ok(Self {
            base_url,
            api_token,
            config,
        })
    }

    /// Savepoint directory from the flag, falling back to the config file.
    pub fn savepoint_dir(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.config.savepoint.directory.clone())
    }

    /// Backoff policy for savepoint waits, with an optional budget override.
    pub fn savepoint_backoff(&self, wait_secs: Option<u64>) -> BackoffPolicy {
        let policy = self.config.savepoint_backoff();
        match wait_secs {
            Some(secs) => policy.with_max_elapsed_time(Duration::from_secs(secs)),
            None => policy,
        }
    }
}
