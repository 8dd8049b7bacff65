//! Failure injection tests for the orchestrator.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use access_sim::error::AccessError;
use access_sim::resilience::{Backoff, FinalStatus, Policy, RetryTimeoutOrchestrator};
use access_sim::scenarios::catalog::BASIC_AUTH;
use access_sim::scenarios::FnOperation;
use access_sim::simulation::{DelayBounds, FailureTiming};

mod common;

#[tokio::test(start_paused = true)]
async fn test_always_failing_records_every_attempt() {
    for max_attempts in 1..=5 {
        let (op, calls) = common::always_failing("Basic Auth");
        let result = RetryTimeoutOrchestrator::new()
            .run(op, &Policy::new(max_attempts, 100.0).with_retry_delay(10.0))
            .await
            .unwrap();

        assert_eq!(result.final_status(), FinalStatus::Failed);
        assert_eq!(result.attempts().len(), max_attempts as usize);
        assert!(result.attempts().iter().all(|a| !a.succeeded && a.error.is_some()));
        assert_eq!(calls.load(Ordering::SeqCst), max_attempts);
        common::assert_gapless(&result);
    }
}

#[tokio::test(start_paused = true)]
async fn test_fallback_replaces_hard_failure() {
    let (op, _) = common::always_failing("OAuth");
    let policy = Policy::new(3, 100.0).with_default_fallback("OAuth");

    let result = RetryTimeoutOrchestrator::new().run(op, &policy).await.unwrap();

    assert_eq!(result.final_status(), FinalStatus::FallbackUsed);
    assert_eq!(
        result.result_value(),
        Some("Access granted via fallback for OAuth due to backend overload")
    );
    assert_eq!(result.attempts().len(), 3);
    assert!(matches!(result.error(), Some(AccessError::RetryExhausted { attempts: 3, .. })));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_shorter_than_minimum_delay_never_succeeds() {
    let op = Arc::new(BASIC_AUTH.operation_with(DelayBounds::new(50.0, 150.0, 0.0)));

    for _ in 0..20 {
        let result = RetryTimeoutOrchestrator::new()
            .run(op.clone(), &Policy::new(3, 1.0))
            .await
            .unwrap();

        assert_eq!(result.final_status(), FinalStatus::Failed);
        assert!(result.attempts().iter().all(|a| matches!(
            a.error,
            Some(AccessError::Timeout { .. })
        )));
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_triggers_fallback_with_timeout_reason() {
    let op = common::fixed_delay("Custom Token", 200, "too late");
    let policy = Policy::new(2, 50.0).with_default_fallback("Custom Token");

    let result = RetryTimeoutOrchestrator::new().run(op, &policy).await.unwrap();

    assert_eq!(result.final_status(), FinalStatus::FallbackUsed);
    assert_eq!(
        result.result_value(),
        Some("Access granted via fallback for Custom Token due to timeout")
    );
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_attempt_does_not_leak_into_next() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let op = FnOperation::shared("OAuth", move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if n == 0 {
                tokio::time::sleep(Duration::from_millis(80)).await;
                Ok("stale".to_string())
            } else {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok("fresh".to_string())
            }
        }
    });

    let result = RetryTimeoutOrchestrator::new()
        .run(op, &Policy::new(2, 50.0))
        .await
        .unwrap();

    // Let the abandoned first attempt run to completion.
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(result.final_status(), FinalStatus::Success);
    assert_eq!(result.result_value(), Some("fresh"));
    assert_eq!(
        common::attempts_without_timing(&result),
        vec![
            (
                1,
                false,
                Some(AccessError::Timeout {
                    scenario: "OAuth".into(),
                    timeout_ms: 50.0
                })
            ),
            (2, true, None),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_attempts_never_overlap() {
    let in_flight = Arc::new(AtomicU32::new(0));
    let overlapped = Arc::new(AtomicU32::new(0));
    let (flight, overlap) = (in_flight.clone(), overlapped.clone());
    let op = FnOperation::shared("Basic Auth", move || {
        let (flight, overlap) = (flight.clone(), overlap.clone());
        async move {
            if flight.fetch_add(1, Ordering::SeqCst) > 0 {
                overlap.fetch_add(1, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            flight.fetch_sub(1, Ordering::SeqCst);
            Err(AccessError::transient("Basic Auth server is under high load"))
        }
    });

    RetryTimeoutOrchestrator::new()
        .run(op, &Policy::new(4, 100.0))
        .await
        .unwrap();

    assert_eq!(overlapped.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failure_after_delay_costs_time() {
    let bounds = DelayBounds::new(100.0, 100.0, 1.0).with_failure_timing(FailureTiming::AfterDelay);
    let op = Arc::new(BASIC_AUTH.operation_with(bounds));

    let result = RetryTimeoutOrchestrator::new()
        .run(op, &Policy::new(2, 500.0))
        .await
        .unwrap();

    assert_eq!(result.final_status(), FinalStatus::Failed);
    assert!(result.total_elapsed_ms() >= 200.0);
    assert!(result.attempts().iter().all(|a| matches!(a.error, Some(AccessError::Transient { .. }))));
}

#[tokio::test(start_paused = true)]
async fn test_exponential_backoff_spaces_attempts() {
    let (op, _) = common::always_failing("OAuth");
    let policy = Policy::new(3, 100.0)
        .with_retry_delay(100.0)
        .with_backoff(Backoff::Exponential { max_delay_ms: 1000.0 });

    let result = RetryTimeoutOrchestrator::new().run(op, &policy).await.unwrap();

    // 100ms after the first failure, 200ms after the second.
    assert!(result.total_elapsed_ms() >= 300.0);
}
