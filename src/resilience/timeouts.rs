//! Deadline race for a single attempt.
//!
//! The attempt runs in its own task and is raced against a timer with
//! `tokio::time::timeout`. When the timer wins, the `JoinHandle` is dropped,
//! which detaches the task instead of cancelling it: the simulated work runs
//! to completion, but its output lands in a handle nobody reads, so it can
//! never reach a later attempt.

use std::future::Future;
use std::time::Duration;

/// Outcome of racing an attempt against its deadline.
#[derive(Debug, PartialEq)]
pub enum Race<T> {
    /// The attempt finished first.
    Finished(T),
    /// The deadline elapsed first; the attempt was abandoned.
    Abandoned,
}

/// Run `attempt` and wait at most `deadline` for it.
///
/// A panic inside the attempt is resumed on the caller.
pub async fn race_deadline<F, T>(deadline: Duration, attempt: F) -> Race<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(attempt);
    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(output)) => Race::Finished(output),
        Ok(Err(join_err)) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
        // Only happens when the runtime shuts down underneath us.
        Ok(Err(_)) => Race::Abandoned,
        Err(_) => Race::Abandoned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fast_attempt_wins() {
        let race = race_deadline(Duration::from_millis(100), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            7
        })
        .await;
        assert_eq!(race, Race::Finished(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_abandoned_but_not_cancelled() {
        let completed = Arc::new(AtomicBool::new(false));
        let flag = completed.clone();
        let race = race_deadline(Duration::from_millis(1), async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        })
        .await;
        assert_eq!(race, Race::Abandoned);
        assert!(!completed.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(completed.load(Ordering::SeqCst), "detached attempt should still finish");
    }
}
