//! `saveExecution(record)`: idempotent by `executionId`, partial updates
//! permitted during execution, final state written once on termination.

use async_trait::async_trait;
use dashmap::DashMap;
use flux_core::ExecutionId;
use flux_workflow::ExecutionRecord;

use crate::error::PersistenceError;

#[async_trait]
pub trait ExecutionRepo: Send + Sync {
    /// Overwrites whatever is stored for `record.id`. Idempotent: calling
    /// this twice with the same record is indistinguishable from calling it
    /// once.
    async fn save(&self, record: &ExecutionRecord) -> Result<(), PersistenceError>;

    async fn load(&self, id: ExecutionId) -> Result<Option<ExecutionRecord>, PersistenceError>;
}

#[derive(Default)]
pub struct InMemoryExecutionRepo {
    records: DashMap<ExecutionId, ExecutionRecord>,
}

impl InMemoryExecutionRepo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExecutionRepo for InMemoryExecutionRepo {
    async fn save(&self, record: &ExecutionRecord) -> Result<(), PersistenceError> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, id: ExecutionId) -> Result<Option<ExecutionRecord>, PersistenceError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }
}
