//! Retry policy: attempt budget, deadlines, delay strategy and fallback.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AccessError, AccessResult};

/// Produces a substitute result from the last error once every attempt failed.
pub type Fallback = Arc<dyn Fn(&AccessError) -> String + Send + Sync>;

/// How long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Backoff {
    /// Always wait `inter_retry_delay_ms`.
    #[default]
    Fixed,
    /// Double `inter_retry_delay_ms` per completed attempt, capped, with jitter.
    Exponential { max_delay_ms: f64 },
}

/// Orchestration policy for one scenario.
#[derive(Clone)]
pub struct Policy {
    pub max_attempts: u32,
    pub per_attempt_timeout_ms: f64,
    pub inter_retry_delay_ms: f64,
    pub backoff: Backoff,
    pub fallback: Option<Fallback>,
}

/// Durations derived from a policy that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyLimits {
    pub timeout: Duration,
    pub retry_delay: Duration,
    pub max_retry_delay: Duration,
}

impl Policy {
    pub fn new(max_attempts: u32, per_attempt_timeout_ms: f64) -> Self {
        Self {
            max_attempts,
            per_attempt_timeout_ms,
            inter_retry_delay_ms: 0.0,
            backoff: Backoff::Fixed,
            fallback: None,
        }
    }

    pub fn with_retry_delay(mut self, inter_retry_delay_ms: f64) -> Self {
        self.inter_retry_delay_ms = inter_retry_delay_ms;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&AccessError) -> String + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Install the standard fallback message for `scenario`.
    pub fn with_default_fallback(self, scenario: impl Into<String>) -> Self {
        let scenario = scenario.into();
        self.with_fallback(move |err| default_fallback_message(&scenario, err))
    }

    /// Reject nonsensical values before any attempt runs.
    pub fn validate(&self) -> AccessResult<PolicyLimits> {
        if self.max_attempts == 0 {
            return Err(AccessError::config("max_attempts must be at least 1"));
        }
        let timeout = millis("per_attempt_timeout_ms", self.per_attempt_timeout_ms)?;
        let retry_delay = millis("inter_retry_delay_ms", self.inter_retry_delay_ms)?;
        let max_retry_delay = match self.backoff {
            Backoff::Fixed => retry_delay,
            Backoff::Exponential { max_delay_ms } => {
                let max = millis("max_retry_delay_ms", max_delay_ms)?;
                if max < retry_delay {
                    return Err(AccessError::config(format!(
                        "max_retry_delay_ms ({}) is below inter_retry_delay_ms ({})",
                        max_delay_ms, self.inter_retry_delay_ms
                    )));
                }
                max
            }
        };
        Ok(PolicyLimits {
            timeout,
            retry_delay,
            max_retry_delay,
        })
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(3, 500.0)
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("max_attempts", &self.max_attempts)
            .field("per_attempt_timeout_ms", &self.per_attempt_timeout_ms)
            .field("inter_retry_delay_ms", &self.inter_retry_delay_ms)
            .field("backoff", &self.backoff)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// `Access granted via fallback for <scenario> due to <reason>`.
pub fn default_fallback_message(scenario: &str, err: &AccessError) -> String {
    let reason = match err {
        AccessError::Timeout { .. } => "timeout",
        AccessError::Transient { .. } => "backend overload",
        _ => "repeated failures",
    };
    format!("Access granted via fallback for {} due to {}", scenario, reason)
}

fn millis(field: &str, value: f64) -> AccessResult<Duration> {
    if !value.is_finite() || value < 0.0 {
        return Err(AccessError::config(format!(
            "{} must be finite and >= 0, got {}",
            field, value
        )));
    }
    Duration::try_from_secs_f64(value / 1000.0)
        .map_err(|_| AccessError::config(format!("{} is too large, got {}", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_policy_limits() {
        let limits = Policy::new(3, 500.0).with_retry_delay(100.0).validate().unwrap();
        assert_eq!(limits.timeout, Duration::from_millis(500));
        assert_eq!(limits.retry_delay, Duration::from_millis(100));
        assert_eq!(limits.max_retry_delay, Duration::from_millis(100));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = Policy::new(0, 500.0).validate().unwrap_err();
        assert_eq!(err, AccessError::config("max_attempts must be at least 1"));
    }

    #[test]
    fn test_negative_and_nan_durations_rejected() {
        assert!(Policy::new(1, -1.0).validate().is_err());
        assert!(Policy::new(1, f64::NAN).validate().is_err());
        assert!(Policy::new(1, 10.0).with_retry_delay(-5.0).validate().is_err());
        assert!(Policy::new(1, 0.0).validate().is_ok());
    }

    #[test]
    fn test_unrepresentable_durations_rejected() {
        match Policy::new(1, 1e30).validate() {
            Err(AccessError::Config { message }) => assert!(message.contains("per_attempt_timeout_ms is too large")),
            other => panic!("expected config error, got {:?}", other),
        }
        assert!(Policy::new(1, 10.0).with_retry_delay(1e30).validate().is_err());
        let capped = Policy::new(1, 10.0).with_backoff(Backoff::Exponential { max_delay_ms: f64::MAX });
        assert!(capped.validate().is_err());
        assert!(Policy::new(1, 1e12).validate().is_ok());
    }

    #[test]
    fn test_exponential_cap_below_base_rejected() {
        let policy = Policy::new(3, 100.0)
            .with_retry_delay(200.0)
            .with_backoff(Backoff::Exponential { max_delay_ms: 50.0 });
        assert!(matches!(policy.validate(), Err(AccessError::Config { .. })));
    }

    #[test]
    fn test_default_fallback_reason() {
        let policy = Policy::default().with_default_fallback("OAuth");
        let fallback = policy.fallback.as_ref().unwrap();
        let timeout = AccessError::Timeout {
            scenario: "OAuth".into(),
            timeout_ms: 500.0,
        };
        assert_eq!(fallback(&timeout), "Access granted via fallback for OAuth due to timeout");
        assert_eq!(
            fallback(&AccessError::transient("OAuth server is under high load")),
            "Access granted via fallback for OAuth due to backend overload"
        );
    }
}
