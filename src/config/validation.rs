//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delay bounds, probabilities, iterations)
//! - Detect duplicate scenario names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Policy values are left to the orchestrator, which rejects them per scenario

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::SimConfig;
use crate::simulation::DelayBounds;

/// A single semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no scenarios configured")]
    NoScenarios,

    #[error("runner.iterations must be at least 1")]
    ZeroIterations,

    #[error("scenario #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("scenario '{name}' is defined more than once")]
    DuplicateName { name: String },

    #[error("scenario '{name}': {problem}")]
    Bounds { name: String, problem: String },
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &SimConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.scenarios.is_empty() {
        errors.push(ValidationError::NoScenarios);
    }
    if config.runner.iterations == 0 {
        errors.push(ValidationError::ZeroIterations);
    }

    let mut seen = HashSet::new();
    for (index, scenario) in config.scenarios.iter().enumerate() {
        if scenario.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
        } else if !seen.insert(scenario.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                name: scenario.name.clone(),
            });
        }

        let bounds = DelayBounds::new(
            scenario.min_delay_ms,
            scenario.max_delay_ms,
            scenario.failure_probability,
        );
        for problem in bounds.check() {
            errors.push(ValidationError::Bounds {
                name: scenario.name.clone(),
                problem,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
