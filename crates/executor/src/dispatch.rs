//! Drives one dispatched node end to end.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use flux_core::{ExecutionId, NodeId, OrganizationId, WorkflowId};
use flux_node::{ExecutionMode, Node, NodeContext, NodeError, NodeInput};
use flux_object_store::ObjectStore;
use flux_parameter::ParameterValue;
use flux_usage::UsageLedger;
use flux_workflow::{Node as WorkflowNode, Workflow};
use tokio_util::sync::CancellationToken;

use crate::input::materialize_inputs;

/// What the scheduler should do with a node once [`NodeExecutor::dispatch`]
/// returns.
#[derive(Debug, Clone)]
pub enum ExecutorOutcome {
    Completed { outputs: HashMap<String, ParameterValue>, usage: i64 },
    Failed { message: String },
    /// The organization's remaining compute budget could not cover this
    /// node's cost; it was never invoked. If insufficient, the node is not
    /// invoked; the execution terminates with status `exhausted`.
    BudgetExhausted,
}

/// Everything [`NodeExecutor::dispatch`] needs for one node. Bundled rather
/// than passed positionally — the parameter count mirrors the five steps
/// of dispatching a node, each of which reaches for a different collaborator.
pub struct NodeDispatch<'a> {
    pub runtime_node: Arc<dyn Node>,
    pub node_def: &'a WorkflowNode,
    pub workflow: &'a Workflow,
    pub workflow_id: WorkflowId,
    pub organization_id: OrganizationId,
    pub execution_id: ExecutionId,
    pub mode: ExecutionMode,
    pub completed_outputs: &'a HashMap<NodeId, HashMap<String, ParameterValue>>,
    pub submitted_params: &'a HashMap<String, ParameterValue>,
    pub env: &'a HashMap<String, serde_json::Value>,
    pub object_store: Arc<dyn ObjectStore>,
    pub usage_ledger: &'a UsageLedger,
    pub usage_so_far: i64,
    pub cancellation: CancellationToken,
}

/// Stateless apart from the per-node deadline; every other collaborator
/// arrives fresh with each [`NodeDispatch`].
pub struct NodeExecutor {
    node_deadline: Duration,
}

impl NodeExecutor {
    #[must_use]
    pub fn new(node_deadline: Duration) -> Self {
        Self { node_deadline }
    }

    pub async fn dispatch(&self, request: NodeDispatch<'_>) -> ExecutorOutcome {
        let descriptor = request.runtime_node.descriptor().clone();

        if !request.usage_ledger.has_capacity(
            request.organization_id,
            request.usage_so_far,
            descriptor.effective_compute_cost(),
        ) {
            return ExecutorOutcome::BudgetExhausted;
        }

        let inputs = match materialize_inputs(
            request.node_def,
            request.workflow,
            request.completed_outputs,
            request.submitted_params,
        ) {
            Ok(inputs) => inputs,
            Err(err) => return ExecutorOutcome::Failed { message: err.to_string() },
        };

        let inputs =
            match resolve_runtime_inputs(inputs, request.object_store.as_ref(), request.organization_id).await {
                Ok(inputs) => inputs,
                Err(err) => return ExecutorOutcome::Failed { message: err.to_string() },
            };

        let mut context = NodeContext::new(
            request.node_def.id,
            request.workflow_id,
            request.organization_id,
            request.execution_id,
            request.mode,
        )
        .with_inputs(inputs)
        .with_object_store(Arc::clone(&request.object_store))
        .with_cancellation(request.cancellation.clone());
        context.env.clone_from(request.env);

        let runtime_node = request.runtime_node;
        let handle = tokio::spawn(async move { runtime_node.execute(context).await });

        let outcome = tokio::select! {
            () = request.cancellation.cancelled() => Err(NodeError::Cancelled),
            () = tokio::time::sleep(self.node_deadline) => Err(NodeError::Timeout),
            joined = handle => match joined {
                Ok(result) => result,
                Err(join_error) => Err(NodeError::failed(format!("node task did not return: {join_error}"))),
            },
        };

        match outcome {
            Ok(output) => {
                let mut wired = HashMap::with_capacity(output.outputs.len());
                for (name, value) in output.outputs {
                    if let Some(decl) = descriptor.output(&name) {
                        if let Err(source) = flux_parameter::validate(&name, decl.kind, &value) {
                            return ExecutorOutcome::Failed {
                                message: NodeError::InvalidOutput { name, source }.to_string(),
                            };
                        }
                    }
                    match flux_parameter::to_wire(
                        value,
                        request.object_store.as_ref(),
                        request.organization_id,
                        request.execution_id,
                    )
                    .await
                    {
                        Ok(wired_value) => {
                            wired.insert(name, wired_value);
                        }
                        Err(source) => {
                            return ExecutorOutcome::Failed {
                                message: NodeError::InvalidOutput { name, source }.to_string(),
                            };
                        }
                    }
                }
                let usage = output.usage_delta.unwrap_or_else(|| descriptor.effective_compute_cost());
                ExecutorOutcome::Completed { outputs: wired, usage }
            }
            Err(node_error) => ExecutorOutcome::Failed { message: node_error.to_string() },
        }
    }
}

async fn resolve_runtime_inputs(
    inputs: HashMap<String, NodeInput>,
    store: &dyn ObjectStore,
    organization_id: OrganizationId,
) -> Result<HashMap<String, NodeInput>, crate::error::ExecutorError> {
    let mut resolved = HashMap::with_capacity(inputs.len());
    for (name, input) in inputs {
        let converted = match input {
            NodeInput::Single(value) => {
                NodeInput::Single(flux_parameter::to_runtime(&name, value, store, organization_id).await?)
            }
            NodeInput::Sequence(values) => {
                let mut sequence = Vec::with_capacity(values.len());
                for value in values {
                    sequence.push(flux_parameter::to_runtime(&name, value, store, organization_id).await?);
                }
                NodeInput::Sequence(sequence)
            }
        };
        resolved.insert(name, converted);
    }
    Ok(resolved)
}
