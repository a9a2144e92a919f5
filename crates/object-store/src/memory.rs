//! In-memory [`ObjectStore`] driver, used by the in-process engine and by
//! tests throughout the workspace.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use flux_core::{ExecutionId, ObjectId, OrganizationId};

use crate::error::ObjectStoreError;
use crate::record::ObjectRecord;
use crate::store::ObjectStore;

struct Entry {
    bytes: Vec<u8>,
    record: ObjectRecord,
}

/// A process-local, concurrent-safe [`ObjectStore`]. Not persisted; every
/// restart starts empty.
#[derive(Default)]
pub struct InMemoryObjectStore {
    entries: DashMap<(OrganizationId, ObjectId), Entry>,
}

impl InMemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        org_id: OrganizationId,
        bytes: Vec<u8>,
        mime_type: String,
        execution_id: Option<ExecutionId>,
    ) -> Result<ObjectId, ObjectStoreError> {
        let id = ObjectId::v4();
        let record = ObjectRecord {
            id,
            mime_type: mime_type.clone(),
            organization_id: org_id,
            execution_id,
            size: bytes.len() as u64,
            created_at: Utc::now(),
        };
        self.entries.insert((org_id, id), Entry { bytes, record });
        Ok(id)
    }

    async fn get(
        &self,
        org_id: OrganizationId,
        id: ObjectId,
    ) -> Result<Option<(Vec<u8>, String)>, ObjectStoreError> {
        Ok(self
            .entries
            .get(&(org_id, id))
            .map(|entry| (entry.bytes.clone(), entry.record.mime_type.clone())))
    }

    async fn presign_read(
        &self,
        org_id: OrganizationId,
        id: ObjectId,
        ttl_seconds: u64,
    ) -> Result<String, ObjectStoreError> {
        if !self.entries.contains_key(&(org_id, id)) {
            return Err(ObjectStoreError::not_found(org_id.to_string(), id.to_string()));
        }
        Ok(format!(
            "memory://{org_id}/{id}?expires_in={ttl_seconds}"
        ))
    }

    async fn delete(&self, org_id: OrganizationId, id: ObjectId) -> Result<(), ObjectStoreError> {
        self.entries.remove(&(org_id, id));
        Ok(())
    }

    async fn stat(
        &self,
        org_id: OrganizationId,
        id: ObjectId,
    ) -> Result<Option<ObjectRecord>, ObjectStoreError> {
        Ok(self.entries.get(&(org_id, id)).map(|entry| entry.record.clone()))
    }
}
