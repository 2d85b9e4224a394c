//! Design Rule Check (DRC) for trace clearance violations
//!
//! Traces are sampled along their curves and tested pairwise and against
//! every foreign pad. Runs are debounced through `DrcScheduler`.
//!
//! # Submodules
//! - `types` - DRC data structures (rules, violations, report)
//! - `distance` - Sampled-trace distance helpers
//! - `checks` - Trace/trace and trace/pad clearance checks
//! - `runners` - Full DRC entry point
//! - `scheduler` - Debounce state machine

mod types;
mod distance;
mod checks;
mod runners;
mod scheduler;

pub use types::{DesignRules, DrcReport, DrcStatus, DrcViolation, ViolationKind};

pub use distance::{within_clearance, SampledTrace};

pub use runners::{run_drc, sample_traces};

pub use scheduler::{DrcPhase, DrcScheduler, RunTicket, ScheduledRun};
