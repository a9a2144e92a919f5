use crate::kind::ParameterKind;

/// Why a value failed to validate against a declared [`ParameterKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParameterError {
    #[error("parameter `{name}` expected kind {expected:?}, got a value shaped like {actual}")]
    KindMismatch {
        name: String,
        expected: ParameterKind,
        actual: String,
    },

    #[error("parameter `{name}` has mime type `{mime_type}`, which is not allowed for kind {kind:?}")]
    UnknownMimeType {
        name: String,
        kind: ParameterKind,
        mime_type: String,
    },

    #[error("required parameter `{name}` has no value")]
    MissingRequiredField { name: String },

    #[error("parameter `{name}`: object reference {object_id} not found")]
    ObjectNotFound { name: String, object_id: String },

    #[error("parameter `{name}`: {reason}")]
    Invalid { name: String, reason: String },
}

impl ParameterError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::KindMismatch { .. } => "PARAM_KIND_MISMATCH",
            Self::UnknownMimeType { .. } => "PARAM_UNKNOWN_MIME_TYPE",
            Self::MissingRequiredField { .. } => "PARAM_MISSING_REQUIRED_FIELD",
            Self::ObjectNotFound { .. } => "PARAM_OBJECT_NOT_FOUND",
            Self::Invalid { .. } => "PARAM_INVALID",
        }
    }

    /// All parameter validation errors are deterministic given the same
    /// input and object store state; none are worth retrying as-is.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let errors = vec![
            ParameterError::KindMismatch {
                name: "x".into(),
                expected: ParameterKind::Number,
                actual: "string".into(),
            },
            ParameterError::UnknownMimeType {
                name: "x".into(),
                kind: ParameterKind::Image,
                mime_type: "audio/mpeg".into(),
            },
            ParameterError::MissingRequiredField { name: "x".into() },
            ParameterError::ObjectNotFound {
                name: "x".into(),
                object_id: "00000000-0000-0000-0000-000000000000".into(),
            },
            ParameterError::Invalid {
                name: "x".into(),
                reason: "bad".into(),
            },
        ];
        let mut codes: Vec<&str> = errors.iter().map(ParameterError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn none_are_retryable() {
        assert!(!ParameterError::MissingRequiredField { name: "x".into() }.is_retryable());
    }

    #[test]
    fn display_kind_mismatch() {
        let err = ParameterError::KindMismatch {
            name: "age".into(),
            expected: ParameterKind::Number,
            actual: "string".into(),
        };
        assert!(err.to_string().contains("age"));
        assert!(err.to_string().contains("Number"));
    }
}
