//! Retry decisions between attempts.

use std::time::Duration;

use crate::resilience::backoff::calculate_backoff;
use crate::resilience::policy::{Backoff, Policy, PolicyLimits};

/// What the orchestrator does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then start the next attempt.
    Retry(Duration),
    /// The attempt budget is spent.
    Exhausted,
}

/// Decide what follows the failure of attempt number `completed` (1-based).
pub fn next_step(completed: u32, policy: &Policy, limits: &PolicyLimits) -> RetryDecision {
    if completed >= policy.max_attempts {
        return RetryDecision::Exhausted;
    }
    let delay = match policy.backoff {
        Backoff::Fixed => limits.retry_delay,
        Backoff::Exponential { .. } => {
            calculate_backoff(completed, limits.retry_delay, limits.max_retry_delay)
        }
    };
    RetryDecision::Retry(delay)
}
