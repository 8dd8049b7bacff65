//! Access-check scenarios.
//!
//! # Data Flow
//! ```text
//! SimConfig.scenarios (or the built-in table)
//!     → catalog.rs (build SimulatedAuth + Policy per entry)
//!     → Scenario { operation, policy }
//!     → runner
//! ```

pub mod catalog;
pub mod operation;

pub use catalog::{builtin_scenarios, BuiltinAuth, Scenario};
pub use operation::{FnOperation, Operation, SimulatedAuth};
