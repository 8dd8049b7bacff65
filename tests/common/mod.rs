//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use access_sim::error::AccessError;
use access_sim::resilience::{AttemptOutcome, OrchestrationResult};
use access_sim::scenarios::{FnOperation, Operation};

/// An operation that always fails with a transient error, counting its calls.
#[allow(dead_code)]
pub fn always_failing(name: &'static str) -> (Arc<dyn Operation>, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let op = FnOperation::shared(name, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Err(AccessError::transient(format!("{} server is under high load", name))) }
    });
    (op, calls)
}

/// An operation that sleeps a fixed time, then succeeds with `value`.
#[allow(dead_code)]
pub fn fixed_delay(name: &'static str, delay_ms: u64, value: &'static str) -> Arc<dyn Operation> {
    FnOperation::shared(name, move || async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(value.to_string())
    })
}

/// Attempt history without elapsed times.
#[allow(dead_code)]
pub fn attempts_without_timing(result: &OrchestrationResult) -> Vec<(u32, bool, Option<AccessError>)> {
    result
        .attempts()
        .iter()
        .map(|a: &AttemptOutcome| (a.attempt_number, a.succeeded, a.error.clone()))
        .collect()
}

/// Attempt numbers must be 1, 2, ..., n.
#[allow(dead_code)]
pub fn assert_gapless(result: &OrchestrationResult) {
    for (index, attempt) in result.attempts().iter().enumerate() {
        assert_eq!(attempt.attempt_number as usize, index + 1, "attempt numbering has a gap");
    }
}
