//! Retry/timeout/fallback orchestration of one operation.
//!
//! # States
//! - Pending: policy validated, nothing executed yet
//! - Attempting(k): attempt `k` racing its deadline
//! - RetryScheduled(k): attempt `k` failed, waiting out the retry delay
//! - Succeeded / FallbackApplied / Failed: terminal
//!
//! # State Transitions
//! ```text
//! Pending → Attempting(1)
//! Attempting(k) → Succeeded: operation returned a value first
//! Attempting(k) → RetryScheduled(k): error or timeout, k < max_attempts
//! RetryScheduled(k) → Attempting(k+1)
//! Attempting(max) → FallbackApplied: fallback configured
//! Attempting(max) → Failed: no fallback
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AccessError, AccessResult};
use crate::observability::metrics;
use crate::resilience::policy::Policy;
use crate::resilience::retries::{next_step, RetryDecision};
use crate::resilience::timeouts::{race_deadline, Race};
use crate::scenarios::Operation;

/// Terminal status of an orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    Success,
    FallbackUsed,
    Failed,
}

impl FinalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalStatus::Success => "success",
            FinalStatus::FallbackUsed => "fallback_used",
            FinalStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptOutcome {
    /// 1-based.
    pub attempt_number: u32,
    pub succeeded: bool,
    pub error: Option<AccessError>,
    pub elapsed_ms: f64,
}

/// Everything one orchestration run produced. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestrationResult {
    scenario_name: String,
    final_status: FinalStatus,
    result_value: Option<String>,
    error: Option<AccessError>,
    total_elapsed_ms: f64,
    attempts: Vec<AttemptOutcome>,
}

impl OrchestrationResult {
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    pub fn final_status(&self) -> FinalStatus {
        self.final_status
    }

    /// The operation's value on success, the fallback's value on fallback.
    pub fn result_value(&self) -> Option<&str> {
        self.result_value.as_deref()
    }

    /// The exhaustion error when every attempt failed, fallback or not.
    pub fn error(&self) -> Option<&AccessError> {
        self.error.as_ref()
    }

    pub fn total_elapsed_ms(&self) -> f64 {
        self.total_elapsed_ms
    }

    pub fn attempts(&self) -> &[AttemptOutcome] {
        &self.attempts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Attempting(u32),
    RetryScheduled(u32),
    Succeeded,
    FallbackApplied,
    Failed,
}

fn transition(from: State, to: State) -> State {
    tracing::debug!(from = ?from, to = ?to, "Orchestration state change");
    to
}

pub(crate) fn as_millis_f64(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Drives an [`Operation`] through the attempts allowed by a [`Policy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryTimeoutOrchestrator;

impl RetryTimeoutOrchestrator {
    pub fn new() -> Self {
        Self
    }

    /// Run `operation` under `policy`.
    ///
    /// Failed attempts are captured in the result. An error is returned only
    /// for an invalid policy, or when the operation reports a non-retryable
    /// error such as [`AccessError::Config`] for its own bounds.
    pub async fn run(&self, operation: Arc<dyn Operation>, policy: &Policy) -> AccessResult<OrchestrationResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("orchestration", %run_id, scenario = %operation.name());
        self.run_attempts(operation, policy).instrument(span).await
    }

    async fn run_attempts(&self, operation: Arc<dyn Operation>, policy: &Policy) -> AccessResult<OrchestrationResult> {
        let scenario = operation.name().to_string();
        let limits = policy.validate()?;
        let started = Instant::now();

        let mut state = State::Pending;
        let mut attempts: Vec<AttemptOutcome> = Vec::with_capacity(policy.max_attempts as usize);
        let mut last_error = None;

        for attempt_number in 1..=policy.max_attempts {
            state = transition(state, State::Attempting(attempt_number));
            let attempt_started = Instant::now();

            let error = match race_deadline(limits.timeout, operation.run()).await {
                Race::Finished(Ok(value)) => {
                    metrics::record_attempt(&scenario, "success");
                    attempts.push(AttemptOutcome {
                        attempt_number,
                        succeeded: true,
                        error: None,
                        elapsed_ms: as_millis_f64(attempt_started.elapsed()),
                    });
                    transition(state, State::Succeeded);
                    tracing::info!(attempts = attempt_number, "Access check succeeded");
                    return Ok(finish(scenario, FinalStatus::Success, Some(value), None, started, attempts));
                }
                Race::Finished(Err(err)) if !err.is_retryable() => {
                    tracing::error!(attempt = attempt_number, error = %err, "Non-retryable failure, aborting");
                    return Err(err);
                }
                Race::Finished(Err(err)) => err,
                Race::Abandoned => AccessError::Timeout {
                    scenario: scenario.clone(),
                    timeout_ms: policy.per_attempt_timeout_ms,
                },
            };

            metrics::record_attempt(&scenario, error.kind());
            attempts.push(AttemptOutcome {
                attempt_number,
                succeeded: false,
                error: Some(error.clone()),
                elapsed_ms: as_millis_f64(attempt_started.elapsed()),
            });

            match next_step(attempt_number, policy, &limits) {
                RetryDecision::Retry(delay) => {
                    tracing::warn!(
                        attempt = attempt_number,
                        max_attempts = policy.max_attempts,
                        delay = ?delay,
                        error = %error,
                        "Attempt {} for {} failed, retrying", attempt_number, scenario
                    );
                    state = transition(state, State::RetryScheduled(attempt_number));
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                RetryDecision::Exhausted => {
                    last_error = Some(error);
                    break;
                }
            }
        }

        let Some(last_error) = last_error else {
            return Err(AccessError::config("policy allowed no attempts"));
        };

        let exhausted = AccessError::RetryExhausted {
            scenario: scenario.clone(),
            attempts: attempts.len() as u32,
            last_error: last_error.to_string(),
            history: attempts.clone(),
        };

        match &policy.fallback {
            Some(fallback) => {
                let value = fallback(&last_error);
                transition(state, State::FallbackApplied);
                tracing::info!(error = %exhausted, fallback = %value, "Attempts exhausted, fallback applied");
                Ok(finish(scenario, FinalStatus::FallbackUsed, Some(value), Some(exhausted), started, attempts))
            }
            None => {
                transition(state, State::Failed);
                tracing::info!(error = %exhausted, "Attempts exhausted, no fallback");
                Ok(finish(scenario, FinalStatus::Failed, None, Some(exhausted), started, attempts))
            }
        }
    }
}

fn finish(
    scenario_name: String,
    final_status: FinalStatus,
    result_value: Option<String>,
    error: Option<AccessError>,
    started: Instant,
    attempts: Vec<AttemptOutcome>,
) -> OrchestrationResult {
    let elapsed = started.elapsed();
    metrics::record_orchestration(&scenario_name, final_status.as_str(), elapsed);
    OrchestrationResult {
        scenario_name,
        final_status,
        result_value,
        error,
        total_elapsed_ms: as_millis_f64(elapsed),
        attempts,
    }
}
