//! `validate(kind, value) -> ok | error`.

use crate::error::ParameterError;
use crate::kind::ParameterKind;
use crate::value::ParameterValue;

/// Checks that `value`'s shape matches `kind`, and — for binary kinds —
/// that its mime type is in the kind's allow-list.
pub fn validate(name: &str, kind: ParameterKind, value: &ParameterValue) -> Result<(), ParameterError> {
    if value.kind() != kind && !(kind == ParameterKind::Any) {
        return Err(ParameterError::KindMismatch {
            name: name.to_string(),
            expected: kind,
            actual: value.kind().as_str().to_string(),
        });
    }

    if let Some(binary) = value.as_binary() {
        let effective_kind = if kind == ParameterKind::Any { value.kind() } else { kind };
        if !effective_kind.accepts_mime_type(binary.mime_type()) {
            return Err(ParameterError::UnknownMimeType {
                name: name.to_string(),
                kind: effective_kind,
                mime_type: binary.mime_type().to_string(),
            });
        }
    }

    Ok(())
}

/// Checks a required declaration has either a value or nothing is owed —
/// callers supply `None` only when neither a literal, a default, nor an
/// incoming edge produced one.
pub fn validate_required(name: &str, required: bool, value: Option<&ParameterValue>) -> Result<(), ParameterError> {
    if required && value.is_none() {
        return Err(ParameterError::MissingRequiredField {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_object_store::{ObjectBytes, ObjectRef};

    #[test]
    fn matching_kind_and_value_passes() {
        assert!(validate("x", ParameterKind::Number, &ParameterValue::Number(1.0)).is_ok());
    }

    #[test]
    fn mismatched_kind_fails() {
        let err = validate("x", ParameterKind::Number, &ParameterValue::String("1".into()))
            .unwrap_err();
        assert_eq!(err.code(), "PARAM_KIND_MISMATCH");
    }

    #[test]
    fn any_kind_accepts_anything() {
        assert!(validate("x", ParameterKind::Any, &ParameterValue::Boolean(true)).is_ok());
    }

    #[test]
    fn binary_value_with_disallowed_mime_fails() {
        use crate::value::BinaryValue;
        let value = ParameterValue::Image(BinaryValue::Ref(ObjectRef::new(
            flux_core::ObjectId::v4(),
            "audio/mpeg",
        )));
        let err = validate("x", ParameterKind::Image, &value).unwrap_err();
        assert_eq!(err.code(), "PARAM_UNKNOWN_MIME_TYPE");
    }

    #[test]
    fn binary_value_with_allowed_mime_passes() {
        use crate::value::BinaryValue;
        let value = ParameterValue::Image(BinaryValue::Fresh(ObjectBytes {
            data: vec![1],
            mime_type: "image/png".into(),
        }));
        assert!(validate("x", ParameterKind::Image, &value).is_ok());
    }

    #[test]
    fn missing_required_value_fails() {
        let err = validate_required("x", true, None).unwrap_err();
        assert_eq!(err.code(), "PARAM_MISSING_REQUIRED_FIELD");
    }

    #[test]
    fn missing_optional_value_passes() {
        assert!(validate_required("x", false, None).is_ok());
    }
}
