//! The [`ObjectStore`] port and its in-memory driver.

use async_trait::async_trait;
use flux_core::{ExecutionId, ObjectId, OrganizationId};

use crate::error::ObjectStoreError;
use crate::record::ObjectRecord;

/// A mapping from `(orgId, id) -> (bytes, mimeType, metadata)`.
///
/// Implementations must be `Send + Sync`: the executor shares one store
/// across concurrently running nodes. `put` always mints a fresh id, even
/// for byte-identical content; `get` and `delete` are idempotent.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under a freshly minted id and returns it.
    async fn put(
        &self,
        org_id: OrganizationId,
        bytes: Vec<u8>,
        mime_type: String,
        execution_id: Option<ExecutionId>,
    ) -> Result<ObjectId, ObjectStoreError>;

    /// Fetches the bytes and mime type for an object, if it exists.
    async fn get(
        &self,
        org_id: OrganizationId,
        id: ObjectId,
    ) -> Result<Option<(Vec<u8>, String)>, ObjectStoreError>;

    /// A URL a caller can hand to an external service instead of bytes.
    /// `ttl_seconds` bounds how long the URL remains valid.
    async fn presign_read(
        &self,
        org_id: OrganizationId,
        id: ObjectId,
        ttl_seconds: u64,
    ) -> Result<String, ObjectStoreError>;

    /// Removes an object. Idempotent: deleting an absent object is not an
    /// error.
    async fn delete(&self, org_id: OrganizationId, id: ObjectId) -> Result<(), ObjectStoreError>;

    /// Metadata for an object, if it exists, independent of its bytes.
    async fn stat(
        &self,
        org_id: OrganizationId,
        id: ObjectId,
    ) -> Result<Option<ObjectRecord>, ObjectStoreError>;
}
