//! Per-organization compute budget enforcement.
//!
//! Per-execution usage accumulation lives on the execution record itself
//! (`flux-workflow::ExecutionUsage`); this crate owns the organization-wide
//! monthly ceiling the executor checks before dispatching each node.

mod error;
mod ledger;

pub use error::UsageError;
pub use ledger::{OrgBudget, UsageLedger};
