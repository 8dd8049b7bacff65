//! Retry, timeout and fallback orchestration for simulated access checks.

pub mod config;
pub mod error;
pub mod observability;
pub mod report;
pub mod resilience;
pub mod runner;
pub mod scenarios;
pub mod simulation;

pub use config::schema::SimConfig;
pub use error::{AccessError, AccessResult};
pub use resilience::{FinalStatus, OrchestrationResult, Policy, RetryTimeoutOrchestrator};
pub use runner::{ScenarioReport, ScenarioRunner};
pub use scenarios::{Operation, Scenario};
