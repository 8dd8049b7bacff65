//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! orchestrator.rs (one run per scenario)
//!     → policy.rs (validate, derive deadlines)
//!     → timeouts.rs (race each attempt against its deadline)
//!     → On failure: retries.rs (retry or exhausted)
//!         → backoff.rs (delay for exponential strategy)
//!     → On exhaustion: policy fallback or Failed
//! ```
//!
//! # Design Decisions
//! - Every attempt has a deadline; a late attempt counts as a failure
//! - Timed-out attempts are abandoned, not cancelled
//! - Attempts within a run never overlap
//! - Invalid policies fail fast and are never retried

pub mod backoff;
pub mod orchestrator;
pub mod policy;
pub mod retries;
pub mod timeouts;

pub use orchestrator::{AttemptOutcome, FinalStatus, OrchestrationResult, RetryTimeoutOrchestrator};
pub use policy::{Backoff, Fallback, Policy};
