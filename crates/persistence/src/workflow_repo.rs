//! `loadWorkflow(id) -> Workflow`.

use async_trait::async_trait;
use dashmap::DashMap;
use flux_core::WorkflowId;
use flux_workflow::Workflow;

use crate::error::PersistenceError;

/// A workflow snapshot the executor reads at submission time. A real
/// backend (the relational store of workflow definitions) implements this
/// against its own schema; the executor only ever sees the typed
/// [`Workflow`].
#[async_trait]
pub trait WorkflowRepo: Send + Sync {
    async fn load(&self, id: WorkflowId) -> Result<Workflow, PersistenceError>;
}

/// An in-memory driver, used by the engine's test harness and by callers
/// that construct workflows programmatically rather than loading them from
/// a collaborator store.
#[derive(Default)]
pub struct InMemoryWorkflowRepo {
    workflows: DashMap<WorkflowId, Workflow>,
}

impl InMemoryWorkflowRepo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, workflow: Workflow) {
        self.workflows.insert(workflow.id, workflow);
    }
}

#[async_trait]
impl WorkflowRepo for InMemoryWorkflowRepo {
    async fn load(&self, id: WorkflowId) -> Result<Workflow, PersistenceError> {
        self.workflows
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(PersistenceError::WorkflowNotFound(id))
    }
}
