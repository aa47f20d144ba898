//! Zero-downtime job updates.
//!
//! This crate sequences an upgrade of a long-running streaming job: find
//! the single running instance, take a savepoint that cancels it, wait for
//! the savepoint with bounded backoff, then start the new artifact from
//! that savepoint.
//!
//! # Components
//!
//! - **`backoff`** — bounded, jittered exponential retry driver
//! - **`filter`** — running-job selection by name base, cardinality guard
//! - **`savepoint`** — request a savepoint and wait for it to complete
//! - **`deploy`** — upload and run an artifact, optionally from a savepoint
//! - **`update`** — the full update sequence
//! - **`terminate`** — cancel the single running instance of a job
//!
//! There is no rollback. If the deploy fails after the savepoint was
//! taken, the old job is already cancelled and an operator must redeploy
//! from the logged savepoint location.

pub mod backoff;
pub mod deploy;
pub mod error;
pub mod filter;
pub mod operator;
pub mod savepoint;
pub mod terminate;
pub mod update;

#[cfg(test)]
mod testing;

pub use backoff::{Attempt, BackoffError};
pub use deploy::{DeploySpec, jar_id};
pub use error::{Operation, RolloutError, RolloutResult};
pub use filter::{running_with_name_base, single_running};
pub use operator::Operator;
pub use update::UpdateRequest;
