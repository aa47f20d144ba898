//! Exponential backoff policy.

use std::time::Duration;

/// Configures a bounded, jittered exponential retry.
///
/// Stateless: every poll session starts its own retry clock from this.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the second attempt.
    pub initial_interval: Duration,
    /// Factor applied to the interval after every failed attempt.
    pub multiplier: f64,
    /// Jitter as a fraction of the current interval (0.0 disables it).
    pub randomization_factor: f64,
    /// Clamps the un-jittered interval.
    pub max_interval: Duration,
    /// Total time budget across all attempts and sleeps.
    pub max_elapsed_time: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_interval: Duration::from_secs(60),
            max_elapsed_time: Duration::from_secs(15 * 60),
        }
    }
}

impl BackoffPolicy {
    /// The same policy with a different total time budget.
    pub fn with_max_elapsed_time(mut self, max_elapsed_time: Duration) -> Self {
        self.max_elapsed_time = max_elapsed_time;
        self
    }

    /// The un-jittered interval that follows `current`.
    ///
    /// A multiplier below 1 or NaN keeps the interval steady; an overflowing
    /// product saturates at `max_interval`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let multiplier = if self.multiplier >= 1.0 { self.multiplier } else { 1.0 };
        Duration::try_from_secs_f64(current.as_secs_f64() * multiplier)
            .map_or(self.max_interval, |next| next.min(self.max_interval))
    }

    /// Bounds of the jittered delay around `interval`. A NaN factor
    /// disables jitter.
    pub fn jitter_bounds(&self, interval: Duration) -> (Duration, Duration) {
        let factor = if self.randomization_factor.is_nan() {
            0.0
        } else {
            self.randomization_factor.clamp(0.0, 1.0)
        };
        let delta = interval.mul_f64(factor);
        (interval.saturating_sub(delta), interval.saturating_add(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_grow_and_clamp() {
        let policy = BackoffPolicy {
            initial_interval: Duration::from_millis(1_000),
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_interval: Duration::from_secs(5),
            max_elapsed_time: Duration::from_secs(60),
        };

        let mut interval = policy.initial_interval;
        let mut seen = vec![];
        for _ in 0..5 {
            seen.push(interval.as_millis());
            interval = policy.next_interval(interval);
        }
        assert_eq!(seen, vec![1_000, 2_000, 4_000, 5_000, 5_000]);
    }

    #[test]
    fn jitter_bounds_follow_factor() {
        let policy = BackoffPolicy::default();
        let (lo, hi) = policy.jitter_bounds(Duration::from_millis(1_000));
        assert_eq!(lo, Duration::from_millis(500));
        assert_eq!(hi, Duration::from_millis(1_500));

        let flat = BackoffPolicy {
            randomization_factor: 0.0,
            ..BackoffPolicy::default()
        };
        let (lo, hi) = flat.jitter_bounds(Duration::from_millis(1_000));
        assert_eq!(lo, hi);
    }

    #[test]
    fn non_finite_tuning_never_panics() {
        let policy = BackoffPolicy {
            multiplier: f64::INFINITY,
            randomization_factor: f64::NAN,
            ..BackoffPolicy::default()
        };
        assert_eq!(
            policy.next_interval(Duration::from_millis(500)),
            policy.max_interval
        );
        let (lo, hi) = policy.jitter_bounds(Duration::from_millis(500));
        assert_eq!((lo, hi), (Duration::from_millis(500), Duration::from_millis(500)));

        let nan_multiplier = BackoffPolicy {
            multiplier: f64::NAN,
            ..BackoffPolicy::default()
        };
        assert_eq!(
            nan_multiplier.next_interval(Duration::from_millis(500)),
            Duration::from_millis(500)
        );
    }
}
