//! Object references and the metadata a store keeps about each object.

use chrono::{DateTime, Utc};
use flux_core::{ExecutionId, ObjectId, OrganizationId};
use serde::{Deserialize, Serialize};

/// The wire representation of a binary parameter value: a pointer, not
/// bytes. `toRuntime`/`toWire` translate between this and [`ObjectBytes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: ObjectId,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl ObjectRef {
    #[must_use]
    pub fn new(id: ObjectId, mime_type: impl Into<String>) -> Self {
        Self {
            id,
            mime_type: mime_type.into(),
        }
    }
}

/// The runtime representation of a binary parameter value: bytes resolved
/// from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectBytes {
    pub data: Vec<u8>,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Metadata the store keeps about an object independent of its bytes.
/// Ids are unguessable; ownership belongs to the organization, not the
/// execution that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ObjectId,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub organization_id: OrganizationId,
    pub execution_id: Option<ExecutionId>,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}
