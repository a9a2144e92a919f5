//! Errors from submitting a workflow for execution.
//!
//! Everything past submission — a node erroring, a budget running out, a
//! cancellation — is not an [`EngineError`]: it is recorded on the
//! execution and surfaces through the event stream instead.

use flux_core::WorkflowId;
use flux_workflow::ValidationError;

/// Failures that keep an execution from ever starting.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("workflow {0} not found")]
    WorkflowNotFound(WorkflowId),

    /// The workflow failed structural validation: surfaced to the caller
    /// directly, nothing persisted.
    #[error("workflow failed validation with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// The organization has no budget left for even the cheapest node in
    /// this workflow's ready set; the execution is refused before a
    /// record is created.
    #[error("organization has no remaining compute budget")]
    BudgetGated,

    #[error("persistence failure: {0}")]
    Persistence(#[from] flux_persistence::PersistenceError),
}

impl EngineError {
    #[must_use]
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
