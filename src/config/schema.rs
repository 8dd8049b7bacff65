//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a simulation run.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::scenarios::catalog::{BuiltinAuth, BASIC_AUTH, CUSTOM_TOKEN, NO_AUTH, OAUTH};
use crate::simulation::FailureTiming;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// How scenarios are run and reported.
    pub runner: RunnerConfig,

    /// Scenario definitions, in report order.
    pub scenarios: Vec<ScenarioConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            observability: ObservabilityConfig::default(),
            runner: RunnerConfig::default(),
            scenarios: vec![
                ScenarioConfig::builtin(&NO_AUTH, PolicyConfig {
                    max_attempts: 1,
                    ..PolicyConfig::default()
                }),
                ScenarioConfig::builtin(&BASIC_AUTH, PolicyConfig {
                    inter_retry_delay_ms: 100.0,
                    fallback_enabled: true,
                    ..PolicyConfig::default()
                }),
                ScenarioConfig::builtin(&OAUTH, PolicyConfig {
                    inter_retry_delay_ms: 500.0,
                    fallback_enabled: true,
                    ..PolicyConfig::default()
                }),
                ScenarioConfig::builtin(&CUSTOM_TOKEN, PolicyConfig {
                    inter_retry_delay_ms: 100.0,
                    ..PolicyConfig::default()
                }),
            ],
        }
    }
}

/// Runner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Sequential (default) or concurrent scenario execution.
    pub mode: RunMode,

    /// Number of times the whole suite is run. Above 1, a summary is reported.
    pub iterations: u32,

    /// Report output format.
    pub format: ReportFormat,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Sequential,
            iterations: 1,
            format: ReportFormat::Text,
        }
    }
}

/// Scenario execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// One scenario at a time, so latencies never overlap.
    #[default]
    Sequential,
    /// All scenarios at once; report order is preserved.
    Concurrent,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// One scenario: a simulated backend plus its retry policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Scenario name, unique within the file.
    pub name: String,

    /// Lower latency bound in milliseconds.
    pub min_delay_ms: f64,

    /// Upper latency bound in milliseconds.
    pub max_delay_ms: f64,

    /// Probability in [0, 1] that a call fails with a transient error.
    pub failure_probability: f64,

    /// Whether injected failures happen before or after the delay.
    pub failure_timing: FailureTiming,

    /// Message returned on success. Built-in names have their own default.
    pub success_message: Option<String>,

    /// Retry policy.
    pub policy: PolicyConfig,
}

impl ScenarioConfig {
    fn builtin(auth: &BuiltinAuth, policy: PolicyConfig) -> Self {
        Self {
            name: auth.name.to_string(),
            min_delay_ms: auth.bounds.min_ms,
            max_delay_ms: auth.bounds.max_ms,
            failure_probability: auth.bounds.failure_probability,
            failure_timing: auth.bounds.failure_timing,
            success_message: Some(auth.success_message.to_string()),
            policy,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            min_delay_ms: 0.0,
            max_delay_ms: 0.0,
            failure_probability: 0.0,
            failure_timing: FailureTiming::BeforeDelay,
            success_message: None,
            policy: PolicyConfig::default(),
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Deadline of each attempt in milliseconds.
    pub per_attempt_timeout_ms: f64,

    /// Delay between attempts in milliseconds (base delay for exponential backoff).
    pub inter_retry_delay_ms: f64,

    /// Substitute a fallback result once all attempts fail.
    pub fallback_enabled: bool,

    /// Delay strategy between attempts.
    pub backoff: BackoffKind,

    /// Cap for exponential backoff in milliseconds.
    pub max_retry_delay_ms: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            per_attempt_timeout_ms: 500.0,
            inter_retry_delay_ms: 0.0,
            fallback_enabled: false,
            backoff: BackoffKind::Fixed,
            max_retry_delay_ms: 2000.0,
        }
    }
}

/// Delay strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
