//! Randomized latency with failure injection.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult};

/// When an injected failure is reported relative to the drawn delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureTiming {
    /// Fail immediately, before any time passes.
    #[default]
    BeforeDelay,
    /// Sleep for the drawn delay, then fail.
    AfterDelay,
}

/// Latency bounds and failure rate of one simulated backend.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DelayBounds {
    pub min_ms: f64,
    pub max_ms: f64,
    pub failure_probability: f64,
    #[serde(default)]
    pub failure_timing: FailureTiming,
}

impl DelayBounds {
    pub const fn new(min_ms: f64, max_ms: f64, failure_probability: f64) -> Self {
        Self {
            min_ms,
            max_ms,
            failure_probability,
            failure_timing: FailureTiming::BeforeDelay,
        }
    }

    /// Bounds that never delay and never fail.
    pub const fn instant() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn with_failure_timing(mut self, timing: FailureTiming) -> Self {
        self.failure_timing = timing;
        self
    }

    /// Check `0 <= min <= max` and `0 <= p <= 1`, collecting every violation.
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.min_ms.is_finite() || self.min_ms < 0.0 {
            problems.push(format!("min_delay_ms must be finite and >= 0, got {}", self.min_ms));
        }
        if !self.max_ms.is_finite() || self.max_ms < 0.0 {
            problems.push(format!("max_delay_ms must be finite and >= 0, got {}", self.max_ms));
        }
        for (field, value) in [("min_delay_ms", self.min_ms), ("max_delay_ms", self.max_ms)] {
            if value.is_finite() && value >= 0.0 && Duration::try_from_secs_f64(value / 1000.0).is_err() {
                problems.push(format!("{} is too large, got {}", field, value));
            }
        }
        if self.min_ms > self.max_ms {
            problems.push(format!(
                "min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.min_ms, self.max_ms
            ));
        }
        if !(0.0..=1.0).contains(&self.failure_probability) {
            problems.push(format!(
                "failure_probability must be within [0, 1], got {}",
                self.failure_probability
            ));
        }
        problems
    }

    pub fn validate(&self) -> AccessResult<()> {
        let problems = self.check();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AccessError::config(problems.join("; ")))
        }
    }
}

/// A single unreliable unit of work.
#[derive(Debug, Clone)]
pub struct DelaySimulator {
    label: String,
    bounds: DelayBounds,
}

impl DelaySimulator {
    /// `label` names the backend in failure messages.
    pub fn new(label: impl Into<String>, bounds: DelayBounds) -> Self {
        Self {
            label: label.into(),
            bounds,
        }
    }

    /// Suspend for a uniformly drawn delay, or fail with a Transient error.
    ///
    /// Returns the delay that was slept on success.
    pub async fn simulate(&self) -> AccessResult<Duration> {
        self.bounds.validate()?;

        // ThreadRng is not Send; it must be gone before the first await.
        let (fail, delay_ms) = {
            let mut rng = rand::thread_rng();
            let fail = rng.gen_bool(self.bounds.failure_probability);
            let delay_ms = if self.bounds.min_ms < self.bounds.max_ms {
                rng.gen_range(self.bounds.min_ms..=self.bounds.max_ms)
            } else {
                self.bounds.min_ms
            };
            (fail, delay_ms)
        };
        let delay = Duration::try_from_secs_f64(delay_ms / 1000.0)
            .map_err(|err| AccessError::config(format!("{} drew an unusable delay: {}", self.label, err)))?;

        if fail {
            if self.bounds.failure_timing == FailureTiming::AfterDelay {
                sleep_unless_zero(delay).await;
            }
            tracing::trace!(backend = %self.label, "Injected backend failure");
            return Err(AccessError::transient(format!(
                "{} server is under high load",
                self.label
            )));
        }

        sleep_unless_zero(delay).await;
        Ok(delay)
    }
}

async fn sleep_unless_zero(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
