//! Scenario runner.
//!
//! # Data Flow
//! ```text
//! [Scenario]
//!     → run_one (own task, wall-clock timer)
//!         → RetryTimeoutOrchestrator::run
//!     → ScenarioReport (result, or Runner error for that scenario only)
//!     → summary.rs when the suite is repeated
//! ```
//!
//! # Design Decisions
//! - Sequential by default so reported latencies are attributable
//! - Each scenario runs in its own task; a panic or config error there
//!   becomes a Runner error instead of aborting the suite
//! - Report order always matches input order

pub mod summary;

use std::any::Any;

use futures_util::future::join_all;
use tokio::time::Instant;

use crate::config::RunMode;
use crate::error::AccessError;
use crate::observability::metrics;
use crate::resilience::orchestrator::{as_millis_f64, OrchestrationResult, RetryTimeoutOrchestrator};
use crate::scenarios::Scenario;

pub use summary::ScenarioSummary;

/// Outcome of one scenario within a suite run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: String,
    /// Wall-clock time around the whole orchestration, retries included.
    pub elapsed_ms: f64,
    pub outcome: Result<OrchestrationResult, AccessError>,
}

/// Runs scenarios through the orchestrator and isolates their failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioRunner {
    orchestrator: RetryTimeoutOrchestrator,
    mode: RunMode,
}

impl ScenarioRunner {
    pub fn new(mode: RunMode) -> Self {
        Self {
            orchestrator: RetryTimeoutOrchestrator::new(),
            mode,
        }
    }

    /// Run every scenario once. Never fails; one report per scenario, in order.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
        tracing::debug!(count = scenarios.len(), mode = ?self.mode, "Running scenarios");
        match self.mode {
            RunMode::Sequential => {
                let mut reports = Vec::with_capacity(scenarios.len());
                for scenario in scenarios {
                    reports.push(self.run_one(scenario.clone()).await);
                }
                reports
            }
            RunMode::Concurrent => join_all(scenarios.iter().cloned().map(|s| self.run_one(s))).await,
        }
    }

    /// Run the whole suite `iterations` times and aggregate per scenario.
    pub async fn run_repeated(&self, scenarios: &[Scenario], iterations: u32) -> Vec<ScenarioSummary> {
        let mut summaries: Vec<ScenarioSummary> =
            scenarios.iter().map(|s| ScenarioSummary::new(s.name())).collect();

        for iteration in 1..=iterations {
            tracing::debug!(iteration, iterations, "Starting suite iteration");
            let reports = self.run_all(scenarios).await;
            for (summary, report) in summaries.iter_mut().zip(&reports) {
                summary.record(report);
            }
        }
        summaries
    }

    async fn run_one(&self, scenario: Scenario) -> ScenarioReport {
        let name = scenario.name().to_string();
        let orchestrator = self.orchestrator;
        let started = Instant::now();

        let handle = tokio::spawn(async move {
            orchestrator
                .run(scenario.operation.clone(), &scenario.policy)
                .await
        });

        let outcome = match handle.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(AccessError::Runner {
                scenario: name.clone(),
                message: err.to_string(),
            }),
            Err(join_err) => {
                let message = if join_err.is_panic() {
                    format!("panicked: {}", panic_message(join_err.into_panic()))
                } else {
                    "task was cancelled".to_string()
                };
                Err(AccessError::Runner {
                    scenario: name.clone(),
                    message,
                })
            }
        };

        if let Err(err) = &outcome {
            metrics::record_runner_error(&name);
            tracing::error!(scenario = %name, error = %err, "Scenario isolated after fault");
        }

        ScenarioReport {
            name,
            elapsed_ms: as_millis_f64(started.elapsed()),
            outcome,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
