//! Bounded exponential retry.
//!
//! [`retry`] drives an operation until it reports [`Attempt::Ready`] or
//! [`Attempt::Abort`], or until the policy's time budget is spent. Delays
//! grow by the policy multiplier, are jittered by its randomization
//! factor, and are clamped to its max interval. Attempts never overlap.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

use deployer_core::BackoffPolicy;

/// Outcome of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T, E> {
    /// Done; stop and return the value.
    Ready(T),
    /// Not done yet; sleep and try again.
    Retry(E),
    /// Permanent failure; stop immediately.
    Abort(E),
}

#[derive(Debug, Error)]
pub enum BackoffError<E> {
    /// The time budget ran out. Deliberately carries no operation error so
    /// it cannot be confused with a remote failure.
    #[error(
        "operation did not succeed within {} seconds ({attempts} attempts)",
        .budget.as_secs_f64()
    )]
    Exhausted {
        budget: Duration,
        elapsed: Duration,
        attempts: u32,
    },

    #[error("{0}")]
    Fatal(E),
}

/// Retry clock for one poll session.
#[derive(Debug)]
pub struct BackoffSession {
    policy: BackoffPolicy,
    rng: SmallRng,
    started: Instant,
    attempts: u32,
    interval: Duration,
}

impl BackoffSession {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self::from_rng(policy, SmallRng::from_rng(&mut rand::rng()))
    }

    /// A session with deterministic jitter.
    pub fn seeded(policy: BackoffPolicy, seed: u64) -> Self {
        Self::from_rng(policy, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(policy: BackoffPolicy, rng: SmallRng) -> Self {
        Self {
            interval: policy.initial_interval,
            policy,
            rng,
            started: Instant::now(),
            attempts: 0,
        }
    }

    /// How many attempts have failed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Records a failed attempt and returns the delay before the next one,
    /// or `None` if sleeping that long would exceed the budget.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.attempts += 1;
        let delay = self.jittered(self.interval);
        self.interval = self.policy.next_interval(self.interval);

        if self.elapsed() + delay > self.policy.max_elapsed_time {
            return None;
        }
        Some(delay)
    }

    fn jittered(&mut self, interval: Duration) -> Duration {
        let (lo, hi) = self.policy.jitter_bounds(interval);
        if lo == hi {
            return lo;
        }
        Duration::from_secs_f64(
            self.rng
                .random_range(lo.as_secs_f64()..=hi.as_secs_f64()),
        )
    }

    fn exhausted<E>(&self) -> BackoffError<E> {
        BackoffError::Exhausted {
            budget: self.policy.max_elapsed_time,
            elapsed: self.elapsed(),
            attempts: self.attempts,
        }
    }
}

/// Runs `op` under `policy` with a fresh retry clock. `op` receives the
/// 1-based attempt number.
pub async fn retry<T, E, F, Fut>(policy: &BackoffPolicy, op: F) -> Result<T, BackoffError<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
{
    retry_with(BackoffSession::new(policy.clone()), op).await
}

/// Like [`retry`], driving an existing session.
pub async fn retry_with<T, E, F, Fut>(
    mut session: BackoffSession,
    mut op: F,
) -> Result<T, BackoffError<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
{
    loop {
        let attempt = session.attempts() + 1;
        match op(attempt).await {
            Attempt::Ready(value) => return Ok(value),
            Attempt::Abort(err) => return Err(BackoffError::Fatal(err)),
            Attempt::Retry(reason) => {
                let Some(delay) = session.next_delay() else {
                    debug!(attempt, %reason, "backoff budget exhausted");
                    return Err(session.exhausted());
                };
                debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    %reason,
                    "retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
