//! Metrics collection.
//!
//! # Metrics
//! - `access_attempts_total` (counter): attempts by scenario, outcome
//! - `access_orchestrations_total` (counter): runs by scenario, final status
//! - `access_orchestration_duration_seconds` (histogram): run latency by scenario
//! - `access_runner_errors_total` (counter): scenarios that produced no result

use std::time::Duration;

use metrics::{counter, histogram};

/// Record one attempt. `outcome` is `success` or an error kind.
pub fn record_attempt(scenario: &str, outcome: &'static str) {
    counter!(
        "access_attempts_total",
        "scenario" => scenario.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a finished orchestration run.
pub fn record_orchestration(scenario: &str, status: &'static str, elapsed: Duration) {
    counter!(
        "access_orchestrations_total",
        "scenario" => scenario.to_string(),
        "status" => status
    )
    .increment(1);
    histogram!(
        "access_orchestration_duration_seconds",
        "scenario" => scenario.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record a scenario isolated by the runner.
pub fn record_runner_error(scenario: &str) {
    counter!("access_runner_errors_total", "scenario" => scenario.to_string()).increment(1);
}
