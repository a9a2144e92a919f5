/// Failures a persistence driver can report.
///
/// Distinguishes retryable infrastructure failures from permanent ones so
/// the executor can apply bounded backoff inside the adapter without
/// inspecting messages.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("workflow {0} not found")]
    WorkflowNotFound(flux_core::WorkflowId),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl PersistenceError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
