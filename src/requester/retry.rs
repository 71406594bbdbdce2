//! Bounded retry envelope around a probe
//!
//! The schedule is a pure function of (attempt, elapsed, random sample), so it
//! can be tested without sleeping. The loop in [`retry_transient`] owns the
//! clock and the sleeps.

use crate::config::RetryConfig;
use crate::requester::probe::Attempt;
use crate::state::Resource;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Exponential backoff schedule with jitter and a total time budget
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffSchedule {
    initial_interval: Duration,
    multiplier: f64,
    max_interval: Duration,
    max_elapsed: Duration,
    randomization_factor: f64,
}

impl BackoffSchedule {
    pub fn new(
        initial_interval: Duration,
        multiplier: f64,
        max_interval: Duration,
        max_elapsed: Duration,
        randomization_factor: f64,
    ) -> Self {
        Self {
            initial_interval,
            multiplier,
            max_interval,
            max_elapsed,
            randomization_factor,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            Duration::from_millis(config.initial_interval_ms),
            config.multiplier,
            Duration::from_millis(config.max_interval_ms),
            Duration::from_millis(config.max_elapsed_ms),
            config.randomization_factor,
        )
    }

    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    /// Interval before jitter for the given zero-based attempt
    ///
    /// `initial * multiplier^attempt`, capped at the max interval. With a
    /// multiplier below 1.0 this narrows after every attempt.
    pub fn base_interval(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);

        if !secs.is_finite() || secs >= self.max_interval.as_secs_f64() {
            return self.max_interval;
        }

        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Delay before the next attempt, or `None` when the budget is spent
    ///
    /// # Arguments
    ///
    /// * `attempt` - Zero-based index of the attempt that just failed
    /// * `elapsed` - Time spent on this URL so far
    /// * `sample` - Uniform random value in `[0, 1)` used for jitter
    pub fn next_interval(&self, attempt: u32, elapsed: Duration, sample: f64) -> Option<Duration> {
        let base = self.base_interval(attempt).as_secs_f64();
        let delta = self.randomization_factor * base;
        let jittered = (base - delta) + sample.clamp(0.0, 1.0) * 2.0 * delta;
        let next = Duration::from_secs_f64(jittered.max(0.0));

        if elapsed.saturating_add(next) > self.max_elapsed {
            return None;
        }

        Some(next)
    }
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Runs probe attempts until one settles or the schedule gives up
///
/// Each call of `attempt` must be a complete, fresh probe. When the time
/// budget runs out the last transient resource is returned as final.
///
/// # Arguments
///
/// * `schedule` - The backoff schedule
/// * `attempt` - Produces one probe attempt per call
///
/// # Returns
///
/// The resource of the settling attempt, plus whether it settled (`true`)
/// or the budget ran out first (`false`)
pub async fn retry_transient<F, Fut>(schedule: &BackoffSchedule, mut attempt: F) -> (Resource, bool)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt>,
{
    let started = Instant::now();
    let mut index: u32 = 0;

    loop {
        let resource = match attempt().await {
            Attempt::Settled(resource) => return (resource, true),
            Attempt::Transient(resource) => resource,
        };

        match schedule.next_interval(index, started.elapsed(), fastrand::f64()) {
            Some(delay) => {
                tracing::debug!(
                    "{}: status {} on attempt {}, retrying in {:?}",
                    resource.url,
                    resource.status_text(),
                    index + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                index = index.saturating_add(1);
            }
            None => {
                tracing::debug!(
                    "{}: retry budget of {:?} exhausted after {} attempt(s)",
                    resource.url,
                    schedule.max_elapsed(),
                    index + 1
                );
                return (resource, false);
            }
        }
    }
}
