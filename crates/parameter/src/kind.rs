use serde::{Deserialize, Serialize};

/// The tag of a parameter's type.
///
/// Binary kinds (`Image`, `Audio`, `Document`, `Blob`, `Gltf`,
/// `BufferGeometry`) are object references on the wire and resolved to bytes
/// at runtime; every other kind carries the same shape on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Number,
    Boolean,
    Date,
    Json,
    GeoJson,
    Image,
    Audio,
    Document,
    Blob,
    Gltf,
    BufferGeometry,
    Secret,
    Any,
}

impl ParameterKind {
    /// Binary kinds carry an [`ObjectRef`](flux_object_store::ObjectRef) on
    /// the wire and [`ObjectBytes`](flux_object_store::ObjectBytes) at
    /// runtime; every other kind is shaped the same on both sides.
    #[must_use]
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Self::Image | Self::Audio | Self::Document | Self::Blob | Self::Gltf | Self::BufferGeometry
        )
    }

    /// The MIME types a value of this binary kind may declare. `None` for
    /// non-binary kinds, which have no MIME concept.
    #[must_use]
    pub fn allowed_mime_types(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Image => Some(&["image/jpeg", "image/png"]),
            Self::Audio => Some(&["audio/mpeg", "audio/webm"]),
            Self::Document => Some(&[
                "application/pdf",
                "text/csv",
                "application/vnd.ms-excel",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "text/html",
                "application/xml",
                "text/xml",
                "image/svg+xml",
                "image/jpeg",
                "image/png",
            ]),
            Self::Blob => Some(&["application/octet-stream"]),
            Self::Gltf => Some(&["model/gltf+json", "model/gltf-binary"]),
            Self::BufferGeometry => Some(&["application/octet-stream", "model/gltf-binary"]),
            Self::String
            | Self::Number
            | Self::Boolean
            | Self::Date
            | Self::Json
            | Self::GeoJson
            | Self::Secret
            | Self::Any => None,
        }
    }

    /// Whether `mime_type` is in this kind's allow-list. Always `false` for
    /// non-binary kinds.
    #[must_use]
    pub fn accepts_mime_type(self, mime_type: &str) -> bool {
        self.allowed_mime_types()
            .is_some_and(|allowed| allowed.contains(&mime_type))
    }

    /// Type assignability per the connection-validation rules:
    /// a kind is assignable to itself; `any` is assignable to and from
    /// every kind; binary kinds are assignable only to the same binary kind
    /// or to `any`; `string` is assignable to `date` (the ISO-8601 check
    /// itself happens at runtime, not here); all other cross-kind pairs are
    /// rejected.
    #[must_use]
    pub fn is_assignable_to(self, target: ParameterKind) -> bool {
        if self == target || self == Self::Any || target == Self::Any {
            return true;
        }
        if self.is_binary() || target.is_binary() {
            return false;
        }
        matches!((self, target), (Self::String, Self::Date))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Json => "json",
            Self::GeoJson => "geojson",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Blob => "blob",
            Self::Gltf => "gltf",
            Self::BufferGeometry => "buffergeometry",
            Self::Secret => "secret",
            Self::Any => "any",
        }
    }
}
