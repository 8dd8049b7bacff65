//! Aggregated statistics for repeated suite runs.

use serde::Serialize;

use crate::resilience::FinalStatus;
use crate::runner::ScenarioReport;

/// Outcome counts and latency spread of one scenario across iterations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub runs: u32,
    pub successes: u32,
    pub fallbacks: u32,
    pub failures: u32,
    /// Runs that produced no orchestration result at all.
    pub errors: u32,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    #[serde(skip)]
    total_ms: f64,
}

impl ScenarioSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runs: 0,
            successes: 0,
            fallbacks: 0,
            failures: 0,
            errors: 0,
            mean_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
            total_ms: 0.0,
        }
    }

    pub fn record(&mut self, report: &ScenarioReport) {
        match &report.outcome {
            Ok(result) => match result.final_status() {
                FinalStatus::Success => self.successes += 1,
                FinalStatus::FallbackUsed => self.fallbacks += 1,
                FinalStatus::Failed => self.failures += 1,
            },
            Err(_) => self.errors += 1,
        }

        let elapsed = report.elapsed_ms;
        self.runs += 1;
        self.total_ms += elapsed;
        self.mean_ms = self.total_ms / f64::from(self.runs);
        if self.runs == 1 {
            self.min_ms = elapsed;
            self.max_ms = elapsed;
        } else {
            self.min_ms = self.min_ms.min(elapsed);
            self.max_ms = self.max_ms.max(elapsed);
        }
    }
}
