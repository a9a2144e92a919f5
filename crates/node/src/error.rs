use std::time::Duration;

/// Error type returned by a node's `execute`, and by registry lookups.
///
/// Distinguishes retryable failures from permanent ones so the executor can
/// decide whether a failure is worth a future replay attempt — though the
/// in-process engine (unlike the durable variant) never replays on its own;
/// this distinction exists for callers built on top of it.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum NodeError {
    /// The node's own logic reported a failure.
    #[error("{message}")]
    Failed {
        message: String,
        retryable: bool,
        backoff_hint: Option<Duration>,
    },

    /// The per-node deadline (`NODE_DEADLINE_SECONDS`) fired.
    #[error("timeout")]
    Timeout,

    /// The execution's cancellation token fired while this node was
    /// running.
    #[error("cancelled")]
    Cancelled,

    /// An output failed to validate against its declared kind.
    #[error("output `{name}` failed validation: {source}")]
    InvalidOutput {
        name: String,
        #[source]
        source: flux_parameter::ParameterError,
    },

    /// No node type is registered under this key.
    #[error("no node registered for type `{type_key}`")]
    UnknownType { type_key: String },
}

impl NodeError {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            retryable: false,
            backoff_hint: None,
        }
    }

    #[must_use]
    pub fn retryable(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            retryable: true,
            backoff_hint: None,
        }
    }

    #[must_use]
    pub fn retryable_with_backoff(message: impl Into<String>, backoff: Duration) -> Self {
        Self::Failed {
            message: message.into(),
            retryable: true,
            backoff_hint: Some(backoff),
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { retryable: true, .. })
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Failed { retryable: false, .. } | Self::InvalidOutput { .. } | Self::UnknownType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_defaults_to_non_retryable() {
        let err = NodeError::failed("boom");
        assert!(!err.is_retryable());
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn retryable_is_retryable_and_not_fatal() {
        let err = NodeError::retryable("transient");
        assert!(err.is_retryable());
        assert!(!err.is_fatal());
    }

    #[test]
    fn timeout_and_cancelled_are_neither_fatal_nor_retryable() {
        assert!(!NodeError::Timeout.is_retryable());
        assert!(!NodeError::Timeout.is_fatal());
        assert!(!NodeError::Cancelled.is_retryable());
        assert!(!NodeError::Cancelled.is_fatal());
    }

    #[test]
    fn display_matches_spec_literal_for_timeout_and_cancel() {
        assert_eq!(NodeError::Timeout.to_string(), "timeout");
        assert_eq!(NodeError::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn retryable_with_backoff_carries_the_hint() {
        let err = NodeError::retryable_with_backoff("rate limited", Duration::from_secs(2));
        match err {
            NodeError::Failed { backoff_hint, .. } => {
                assert_eq!(backoff_hint, Some(Duration::from_secs(2)));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
