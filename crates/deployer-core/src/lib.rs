pub mod backoff;
pub mod config;
pub mod types;

pub use backoff::BackoffPolicy;
pub use config::{ConfigError, DeployerConfig};
pub use types::*;
