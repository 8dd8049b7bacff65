//! Built-in scenarios and construction from configuration.

use std::fmt;
use std::sync::Arc;

use crate::config::schema::{BackoffKind, PolicyConfig, ScenarioConfig, SimConfig};
use crate::resilience::policy::{Backoff, Policy};
use crate::scenarios::operation::{Operation, SimulatedAuth};
use crate::simulation::DelayBounds;

/// A built-in access mechanism: fixed latency profile and success message.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinAuth {
    pub name: &'static str,
    pub bounds: DelayBounds,
    pub success_message: &'static str,
}

pub const NO_AUTH: BuiltinAuth = BuiltinAuth {
    name: "No Auth",
    bounds: DelayBounds::new(0.0, 0.0, 0.0),
    success_message: "Access granted without authentication.",
};

pub const BASIC_AUTH: BuiltinAuth = BuiltinAuth {
    name: "Basic Auth",
    bounds: DelayBounds::new(50.0, 150.0, 0.05),
    success_message: "Access granted with Basic Authentication.",
};

pub const OAUTH: BuiltinAuth = BuiltinAuth {
    name: "OAuth",
    bounds: DelayBounds::new(100.0, 300.0, 0.10),
    success_message: "Access granted with OAuth.",
};

pub const CUSTOM_TOKEN: BuiltinAuth = BuiltinAuth {
    name: "Custom Token",
    bounds: DelayBounds::new(150.0, 250.0, 0.05),
    success_message: "Access granted with Custom Token Validation.",
};

/// In report order.
pub const BUILTIN: [BuiltinAuth; 4] = [NO_AUTH, BASIC_AUTH, OAUTH, CUSTOM_TOKEN];

impl BuiltinAuth {
    pub fn lookup(name: &str) -> Option<&'static BuiltinAuth> {
        BUILTIN.iter().find(|b| b.name == name)
    }

    pub fn operation(&self) -> SimulatedAuth {
        self.operation_with(self.bounds)
    }

    /// Same mechanism with different latency bounds.
    pub fn operation_with(&self, bounds: DelayBounds) -> SimulatedAuth {
        SimulatedAuth::new(self.name, bounds, self.success_message)
    }
}

/// One operation paired with the policy it runs under.
///
/// The scenario has no name of its own; reports and orchestration results
/// both use the operation's name.
#[derive(Clone)]
pub struct Scenario {
    pub operation: Arc<dyn Operation>,
    pub policy: Policy,
}

impl Scenario {
    pub fn new(operation: Arc<dyn Operation>, policy: Policy) -> Self {
        Self { operation, policy }
    }

    pub fn name(&self) -> &str {
        self.operation.name()
    }

    pub fn from_config(config: &ScenarioConfig) -> Self {
        let bounds = DelayBounds::new(config.min_delay_ms, config.max_delay_ms, config.failure_probability)
            .with_failure_timing(config.failure_timing);
        let success_message = match (&config.success_message, BuiltinAuth::lookup(&config.name)) {
            (Some(message), _) => message.clone(),
            (None, Some(builtin)) => builtin.success_message.to_string(),
            (None, None) => format!("Access granted with {}.", config.name),
        };
        let operation = SimulatedAuth::new(config.name.clone(), bounds, success_message);
        Self::new(Arc::new(operation), policy_from_config(&config.name, &config.policy))
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Values are carried over as-is; the orchestrator rejects invalid ones.
pub fn policy_from_config(scenario: &str, config: &PolicyConfig) -> Policy {
    let backoff = match config.backoff {
        BackoffKind::Fixed => Backoff::Fixed,
        BackoffKind::Exponential => Backoff::Exponential {
            max_delay_ms: config.max_retry_delay_ms,
        },
    };
    let policy = Policy::new(config.max_attempts, config.per_attempt_timeout_ms)
        .with_retry_delay(config.inter_retry_delay_ms)
        .with_backoff(backoff);
    if config.fallback_enabled {
        policy.with_default_fallback(scenario)
    } else {
        policy
    }
}

/// The four built-in scenarios with their default policies.
pub fn builtin_scenarios() -> Vec<Scenario> {
    SimConfig::default().scenarios.iter().map(Scenario::from_config).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_policies() {
        let scenarios = builtin_scenarios();
        let names: Vec<_> = scenarios.iter().map(Scenario::name).collect();
        assert_eq!(names, ["No Auth", "Basic Auth", "OAuth", "Custom Token"]);

        assert_eq!(scenarios[0].policy.max_attempts, 1);
        assert!(scenarios[0].policy.fallback.is_none());
        assert!(scenarios[2].policy.fallback.is_some());
        assert_eq!(scenarios[2].policy.inter_retry_delay_ms, 500.0);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(BuiltinAuth::lookup("OAuth").unwrap().bounds.max_ms, 300.0);
        assert!(BuiltinAuth::lookup("Kerberos").is_none());
    }

    #[tokio::test]
    async fn test_custom_scenario_message() {
        let config = ScenarioConfig {
            name: "Kerberos".into(),
            ..ScenarioConfig::default()
        };
        let scenario = Scenario::from_config(&config);
        assert_eq!(scenario.operation.run().await.unwrap(), "Access granted with Kerberos.");
    }

    #[test]
    fn test_exponential_backoff_from_config() {
        let config = PolicyConfig {
            backoff: BackoffKind::Exponential,
            max_retry_delay_ms: 800.0,
            ..PolicyConfig::default()
        };
        let policy = policy_from_config("OAuth", &config);
        assert_eq!(policy.backoff, Backoff::Exponential { max_delay_ms: 800.0 });
    }
}
