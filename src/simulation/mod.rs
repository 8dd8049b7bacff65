//! Backend latency simulation.
//!
//! # Data Flow
//! ```text
//! Operation::run()
//!     → delay.rs (draw latency, inject failure)
//!     → elapsed duration or Transient error
//! ```
//!
//! # Design Decisions
//! - No state between calls; every draw is independent
//! - Failure before the delay by default, so failing is cheap
//! - No retry logic here; that belongs to the orchestrator

pub mod delay;

pub use delay::{DelayBounds, DelaySimulator, FailureTiming};
