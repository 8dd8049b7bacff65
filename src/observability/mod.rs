//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator and runner produce:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (counters, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → Terminal / log aggregation
//!     → Whatever recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Run ID (UUID v4) attached to every orchestration span
//! - Logs never go to stdout; stdout carries the report
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
