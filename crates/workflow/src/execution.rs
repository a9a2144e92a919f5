//! Per-execution and per-node execution state, owned by the scheduler and
//! mutated solely through the transitions in [`crate::transition`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use flux_core::{DeploymentId, ExecutionId, NodeId, OrganizationId, WorkflowId};
use serde::{Deserialize, Serialize};

use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Idle,
    Submitted,
    Executing,
    Completed,
    Error,
    Cancelled,
    Exhausted,
}

impl ExecutionStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Cancelled | Self::Exhausted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeExecutionStatus {
    Idle,
    Executing,
    Completed,
    Error,
    Skipped,
}

impl NodeExecutionStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Skipped)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeExecution {
    pub node_id: NodeId,
    pub status: NodeExecutionStatus,
    pub outputs: Option<HashMap<String, flux_parameter::ParameterValue>>,
    pub error: Option<String>,
}

impl NodeExecution {
    #[must_use]
    pub fn idle(node_id: NodeId) -> Self {
        Self {
            node_id,
            status: NodeExecutionStatus::Idle,
            outputs: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionUsage {
    pub total: u64,
}

impl ExecutionUsage {
    #[must_use]
    pub fn zero() -> Self {
        Self { total: 0 }
    }
}

impl Default for ExecutionUsage {
    fn default() -> Self {
        Self::zero()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: ExecutionId,
    pub workflow_id: WorkflowId,
    pub organization_id: OrganizationId,
    pub deployment_id: Option<DeploymentId>,
    pub status: ExecutionStatus,
    pub node_executions: HashMap<NodeId, NodeExecution>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub usage: ExecutionUsage,
}

impl ExecutionRecord {
    #[must_use]
    pub fn new(
        id: ExecutionId,
        workflow_id: WorkflowId,
        organization_id: OrganizationId,
        nodes: &[Node],
        started_at: DateTime<Utc>,
    ) -> Self {
        let node_executions = nodes.iter().map(|n| (n.id, NodeExecution::idle(n.id))).collect();
        Self {
            id,
            workflow_id,
            organization_id,
            deployment_id: None,
            status: ExecutionStatus::Submitted,
            node_executions,
            error: None,
            started_at,
            ended_at: None,
            usage: ExecutionUsage::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_has_every_node_idle() {
        let node = Node::new(NodeId::v4(), flux_core::Key::new("n").unwrap());
        let record = ExecutionRecord::new(
            ExecutionId::v4(),
            WorkflowId::v4(),
            OrganizationId::v4(),
            std::slice::from_ref(&node),
            Utc::now(),
        );
        assert_eq!(record.node_executions.len(), 1);
        assert_eq!(
            record.node_executions.get(&node.id).unwrap().status,
            NodeExecutionStatus::Idle
        );
        assert_eq!(record.status, ExecutionStatus::Submitted);
    }

    #[test]
    fn terminal_statuses_are_recognized() {
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Exhausted.is_terminal());
        assert!(!ExecutionStatus::Executing.is_terminal());
    }
}
