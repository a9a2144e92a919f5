//! Runtime values carried by parameters, and the conversions between the
//! wire shape (object references) and the runtime shape (bytes) for binary
//! kinds.

use chrono::{DateTime, Utc};
use flux_object_store::{ObjectBytes, ObjectRef};
use secrecy::SecretString;

use crate::kind::ParameterKind;

/// A binary value in one of its two shapes. `Ref` is what travels on the
/// wire; `Bytes` is what a node sees in its inputs and produces as output.
///
/// `source` on [`ObjectBytes`]... is not tracked here directly; instead
/// [`BinaryValue::Resolved`] remembers the [`ObjectRef`] it was resolved
/// from, so converting straight back to wire form (without the node having
/// touched the bytes) reproduces the same id rather than minting a new one.
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryValue {
    /// Not yet resolved: the wire shape.
    Ref(ObjectRef),
    /// Resolved bytes, remembering the reference they came from.
    Resolved { bytes: ObjectBytes, source: ObjectRef },
    /// Bytes produced fresh by a node, with no prior object identity.
    Fresh(ObjectBytes),
}

impl BinaryValue {
    #[must_use]
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Ref(r) => &r.mime_type,
            Self::Resolved { bytes, .. } | Self::Fresh(bytes) => &bytes.mime_type,
        }
    }

    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Ref(_) => None,
            Self::Resolved { bytes, .. } | Self::Fresh(bytes) => Some(&bytes.data),
        }
    }
}

/// A value whose concrete shape matches its declared [`ParameterKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Json(serde_json::Value),
    GeoJson(serde_json::Value),
    Image(BinaryValue),
    Audio(BinaryValue),
    Document(BinaryValue),
    Blob(BinaryValue),
    Gltf(BinaryValue),
    BufferGeometry(BinaryValue),
    Secret(SecretString),
    Any(serde_json::Value),
}

impl ParameterValue {
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::String(_) => ParameterKind::String,
            Self::Number(_) => ParameterKind::Number,
            Self::Boolean(_) => ParameterKind::Boolean,
            Self::Date(_) => ParameterKind::Date,
            Self::Json(_) => ParameterKind::Json,
            Self::GeoJson(_) => ParameterKind::GeoJson,
            Self::Image(_) => ParameterKind::Image,
            Self::Audio(_) => ParameterKind::Audio,
            Self::Document(_) => ParameterKind::Document,
            Self::Blob(_) => ParameterKind::Blob,
            Self::Gltf(_) => ParameterKind::Gltf,
            Self::BufferGeometry(_) => ParameterKind::BufferGeometry,
            Self::Secret(_) => ParameterKind::Secret,
            Self::Any(_) => ParameterKind::Any,
        }
    }

    #[must_use]
    pub fn as_binary(&self) -> Option<&BinaryValue> {
        match self {
            Self::Image(b)
            | Self::Audio(b)
            | Self::Document(b)
            | Self::Blob(b)
            | Self::Gltf(b)
            | Self::BufferGeometry(b) => Some(b),
            _ => None,
        }
    }

    /// Rebuilds this value with a new binary payload, keeping the same
    /// binary kind. Panics if called on a non-binary value — callers only
    /// do this after matching on [`Self::as_binary`].
    #[must_use]
    pub(crate) fn with_binary(&self, binary: BinaryValue) -> Self {
        match self {
            Self::Image(_) => Self::Image(binary),
            Self::Audio(_) => Self::Audio(binary),
            Self::Document(_) => Self::Document(binary),
            Self::Blob(_) => Self::Blob(binary),
            Self::Gltf(_) => Self::Gltf(binary),
            Self::BufferGeometry(_) => Self::BufferGeometry(binary),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ParameterValue::Number(1.0).kind(), ParameterKind::Number);
        assert_eq!(
            ParameterValue::Image(BinaryValue::Ref(ObjectRef::new(
                flux_core::ObjectId::v4(),
                "image/png"
            )))
            .kind(),
            ParameterKind::Image
        );
    }

    #[test]
    fn secret_does_not_leak_through_debug() {
        let value = ParameterValue::Secret(SecretString::from("super-secret".to_string()));
        let rendered = format!("{value:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn secret_exposes_on_demand() {
        let secret = SecretString::from("super-secret".to_string());
        assert_eq!(secret.expose_secret(), "super-secret");
    }

    #[test]
    fn binary_value_reports_mime_type_in_every_shape() {
        let id = flux_core::ObjectId::v4();
        let r#ref = BinaryValue::Ref(ObjectRef::new(id, "image/png"));
        assert_eq!(r#ref.mime_type(), "image/png");

        let fresh = BinaryValue::Fresh(ObjectBytes {
            data: vec![1, 2, 3],
            mime_type: "image/png".into(),
        });
        assert_eq!(fresh.bytes(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn with_binary_preserves_kind() {
        let id = flux_core::ObjectId::v4();
        let original = ParameterValue::Image(BinaryValue::Ref(ObjectRef::new(id, "image/png")));
        let replaced = original.with_binary(BinaryValue::Fresh(ObjectBytes {
            data: vec![9],
            mime_type: "image/png".into(),
        }));
        assert_eq!(replaced.kind(), ParameterKind::Image);
    }
}
