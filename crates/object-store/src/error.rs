//! Error type for object store operations.

/// Failures a backing store can report. Distinguishes retryable
/// infrastructure failures from permanent ones so callers can apply a retry
/// policy without inspecting messages.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ObjectStoreError {
    #[error("object not found: org={org_id} id={id}")]
    NotFound { org_id: String, id: String },

    #[error("mime type {mime_type:?} is not in the allow-list for this kind")]
    UnsupportedMimeType { mime_type: String },

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend io error: {0}")]
    Io(String),
}

impl ObjectStoreError {
    #[must_use]
    pub fn not_found(org_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            org_id: org_id.into(),
            id: id.into(),
        }
    }

    /// Whether the caller may retry the same call and expect a different
    /// outcome. Only infrastructure failures are retryable; a missing
    /// object or a rejected mime type will not resolve itself.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_not_retryable() {
        assert!(!ObjectStoreError::not_found("org-1", "obj-1").is_retryable());
    }

    #[test]
    fn unavailable_is_retryable() {
        assert!(ObjectStoreError::Unavailable("down".into()).is_retryable());
    }

    #[test]
    fn display_not_found() {
        let err = ObjectStoreError::not_found("org-1", "obj-1");
        assert_eq!(err.to_string(), "object not found: org=org-1 id=obj-1");
    }
}
