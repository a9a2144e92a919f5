//! [`NodeContext`]: everything an executing node is given.

use std::collections::HashMap;
use std::sync::Arc;

use flux_core::{ExecutionId, NodeId, OrganizationId, WorkflowId};
use flux_object_store::ObjectStore;
use tokio_util::sync::CancellationToken;

use flux_parameter::ParameterValue;

/// How this execution was triggered — nodes may branch on it (e.g. to skip
/// side effects during a dry run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Production,
    Test,
}

/// The materialized value of one input: a single value, or — for a
/// `repeated` input — an ordered sequence gathered in edge-insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeInput {
    Single(ParameterValue),
    Sequence(Vec<ParameterValue>),
}

impl NodeInput {
    #[must_use]
    pub fn as_single(&self) -> Option<&ParameterValue> {
        match self {
            Self::Single(value) => Some(value),
            Self::Sequence(_) => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[ParameterValue]> {
        match self {
            Self::Sequence(values) => Some(values),
            Self::Single(_) => None,
        }
    }
}

/// A collaborator hook nodes may use to reach external integrations
/// (third-party AI/SMS/email providers). The concrete integrations are
/// out of scope here; this is the seam the executor wires up.
#[async_trait::async_trait]
pub trait IntegrationProvider: Send + Sync {
    async fn get(&self, name: &str) -> Option<serde_json::Value>;
}

/// `{nodeId, workflowId, organizationId, mode, inputs, env, objectStore?,
/// getIntegration?}`.
///
/// `sleep`/`doStep` from the durable variant are intentionally absent: the
/// in-process engine this workspace implements may omit them per the
/// external-interface contract, and nodes here never declare themselves
/// multi-step.
#[non_exhaustive]
pub struct NodeContext {
    pub node_id: NodeId,
    pub workflow_id: WorkflowId,
    pub organization_id: OrganizationId,
    pub execution_id: ExecutionId,
    pub mode: ExecutionMode,
    pub inputs: HashMap<String, NodeInput>,
    pub env: HashMap<String, serde_json::Value>,
    pub object_store: Option<Arc<dyn ObjectStore>>,
    pub integrations: Option<Arc<dyn IntegrationProvider>>,
    pub cancellation: CancellationToken,
}

impl NodeContext {
    #[must_use]
    pub fn new(
        node_id: NodeId,
        workflow_id: WorkflowId,
        organization_id: OrganizationId,
        execution_id: ExecutionId,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            node_id,
            workflow_id,
            organization_id,
            execution_id,
            mode,
            inputs: HashMap::new(),
            env: HashMap::new(),
            object_store: None,
            integrations: None,
            cancellation: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_inputs(mut self, inputs: HashMap<String, NodeInput>) -> Self {
        self.inputs = inputs;
        self
    }

    #[must_use]
    pub fn with_object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    #[must_use]
    pub fn input(&self, name: &str) -> Option<&ParameterValue> {
        self.inputs.get(name).and_then(NodeInput::as_single)
    }

    #[must_use]
    pub fn input_sequence(&self, name: &str) -> Option<&[ParameterValue]> {
        self.inputs.get(name).and_then(NodeInput::as_sequence)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl std::fmt::Debug for NodeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeContext")
            .field("node_id", &self.node_id)
            .field("workflow_id", &self.workflow_id)
            .field("organization_id", &self.organization_id)
            .field("execution_id", &self.execution_id)
            .field("mode", &self.mode)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
