//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or SimConfig::default()
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SimConfig (validated, immutable)
//!     → scenarios::catalog builds Scenario values
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, LoadError};
pub use schema::{
    BackoffKind, ObservabilityConfig, PolicyConfig, ReportFormat, RunMode, RunnerConfig, ScenarioConfig,
    SimConfig,
};
