//! The orchestrator: wires the scheduler, executor, event bus, persistence,
//! and usage ledger into one end-to-end run of a workflow.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use flux_core::{ExecutionId, NodeId, OrganizationId, WorkflowId};
use flux_eventbus::{Event, EventEmitter, EventStream};
use flux_executor::{ExecutorOutcome, NodeDispatch, NodeExecutor};
use flux_node::{ExecutionMode, NodeRegistry};
use flux_object_store::ObjectStore;
use flux_parameter::{BinaryValue, ParameterValue};
use flux_persistence::{ExecutionRepo, PersistenceError, WorkflowRepo};
use flux_scheduler::Scheduler;
use flux_usage::UsageLedger;
use flux_workflow::{ExecutionRecord, ExecutionStatus, ExecutionUsage, NodeExecutionStatus, Workflow};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Parameter values submitted at execution start, keyed by the node they
/// feed and the input name on that node. Already typed — any JSON the
/// engine is fronted with is converted to this shape at that boundary, not
/// here.
pub type SubmittedParameters = HashMap<NodeId, HashMap<String, ParameterValue>>;

/// Ties every collaborator an execution needs together, and hands out
/// [`EventStream`]s to callers that submit a workflow.
///
/// Cheap to clone-by-`Arc`: construct once per process and share it across
/// however many HTTP requests or CLI invocations call [`Self::submit`].
pub struct Engine {
    config: EngineConfig,
    registry: Arc<NodeRegistry>,
    workflows: Arc<dyn WorkflowRepo>,
    executions: Arc<dyn ExecutionRepo>,
    object_store: Arc<dyn ObjectStore>,
    usage: Arc<UsageLedger>,
    executor: Arc<NodeExecutor>,
    env: HashMap<String, serde_json::Value>,
    cancellations: DashMap<ExecutionId, CancellationToken>,
}

impl Engine {
    #[must_use]
    pub fn new(
        config: EngineConfig,
        registry: Arc<NodeRegistry>,
        workflows: Arc<dyn WorkflowRepo>,
        executions: Arc<dyn ExecutionRepo>,
        object_store: Arc<dyn ObjectStore>,
        usage: Arc<UsageLedger>,
        env: HashMap<String, serde_json::Value>,
    ) -> Self {
        let executor = Arc::new(NodeExecutor::new(config.node_deadline));
        Self {
            config,
            registry,
            workflows,
            executions,
            object_store,
            usage,
            executor,
            env,
            cancellations: DashMap::new(),
        }
    }

    /// Loads and validates `workflow_id`, checks that the organization's
    /// budget can cover at least the workflow's cheapest node, persists the
    /// initial [`ExecutionRecord`], and spawns the run in the background.
    ///
    /// Returns immediately with the new execution's id and its event
    /// stream; the caller consumes the stream at its own pace (the
    /// execution keeps running even if nobody reads from it).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the workflow is unknown, fails structural
    /// validation, or the organization has no budget left for even the
    /// cheapest node.
    pub async fn submit(
        self: &Arc<Self>,
        workflow_id: WorkflowId,
        organization_id: OrganizationId,
        mode: ExecutionMode,
        parameters: SubmittedParameters,
    ) -> Result<(ExecutionId, EventStream), EngineError> {
        let workflow = self.workflows.load(workflow_id).await.map_err(|err| match err {
            PersistenceError::WorkflowNotFound(id) => EngineError::WorkflowNotFound(id),
            other => EngineError::Persistence(other),
        })?;

        flux_workflow::validate(&workflow).map_err(EngineError::Validation)?;

        let cheapest_cost = workflow
            .nodes
            .iter()
            .filter_map(|node| self.registry.descriptor(node.type_key.as_str()))
            .map(flux_node::NodeDescriptor::effective_compute_cost)
            .min()
            .unwrap_or(0);
        if !self.usage.has_capacity(organization_id, 0, cheapest_cost) {
            return Err(EngineError::BudgetGated);
        }

        let execution_id = ExecutionId::v4();
        let record =
            ExecutionRecord::new(execution_id, workflow_id, organization_id, &workflow.nodes, Utc::now());
        self.executions.save(&record).await?;

        let cancellation = CancellationToken::new();
        self.cancellations.insert(execution_id, cancellation.clone());

        let (emitter, stream) = flux_eventbus::channel(256);

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            engine.run_execution(workflow, record, parameters, mode, cancellation, emitter).await;
            engine.cancellations.remove(&execution_id);
        });

        Ok((execution_id, stream))
    }

    /// Requests that a running execution stop. In-flight nodes are allowed
    /// to unwind rather than being forcibly killed; new dispatch simply
    /// stops. Returns `false` if `execution_id` is unknown or already
    /// terminal.
    pub fn cancel(&self, execution_id: ExecutionId) -> bool {
        match self.cancellations.get(&execution_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// The background task backing one [`Self::submit`] call: runs the
    /// ready-set scheduling loop to completion, emitting events and
    /// persisting the record as it goes.
    async fn run_execution(
        &self,
        workflow: Workflow,
        mut record: ExecutionRecord,
        submitted: SubmittedParameters,
        mode: ExecutionMode,
        cancellation: CancellationToken,
        emitter: EventEmitter,
    ) {
        let workflow = Arc::new(workflow);
        let mut scheduler = Scheduler::new(&workflow);

        record.status = ExecutionStatus::Executing;
        if let Err(err) = self.executions.save(&record).await {
            tracing::warn!(%err, execution_id = %record.id, "failed to persist execution start");
        }

        let mut completed_outputs: HashMap<NodeId, HashMap<String, ParameterValue>> = HashMap::new();
        let mut usage_so_far: i64 = 0;
        let mut exhausted = false;
        let empty_params: HashMap<String, ParameterValue> = HashMap::new();

        let mut in_flight: JoinSet<(NodeId, ExecutorOutcome)> = JoinSet::new();

        loop {
            if !exhausted && !cancellation.is_cancelled() {
                let open_slots = self.config.max_node_parallelism.saturating_sub(in_flight.len());
                if open_slots > 0 {
                    let batch_size = self.budget_limited_batch_size(
                        &workflow,
                        &scheduler,
                        record.organization_id,
                        usage_so_far,
                        open_slots,
                        &mut exhausted,
                    );
                    for node_id in scheduler.next_ready_batch(batch_size) {
                        self.dispatch_one(
                            &workflow,
                            &mut record,
                            node_id,
                            &submitted,
                            &completed_outputs,
                            usage_so_far,
                            &empty_params,
                            mode,
                            cancellation.clone(),
                            &emitter,
                            &mut in_flight,
                        )
                        .await;
                    }
                }
            }

            if in_flight.is_empty() {
                let halted = exhausted || cancellation.is_cancelled();
                if halted || !scheduler.has_pending_work() {
                    break;
                }
                // Nothing dispatched this round and nothing running, yet
                // work remains pending: every remaining node is waiting on
                // one still `Running` elsewhere. Unreachable in practice
                // (a non-empty ready set would have been dispatched above)
                // but guards against spinning if it ever is.
                break;
            }

            let Some(joined) = in_flight.join_next().await else {
                continue;
            };
            let (node_id, outcome) = match joined {
                Ok(result) => result,
                Err(join_error) => {
                    tracing::error!(%join_error, "node task panicked");
                    continue;
                }
            };

            self.record_outcome(
                node_id,
                outcome,
                &mut scheduler,
                &mut record,
                &mut completed_outputs,
                &mut usage_so_far,
                &cancellation,
                &emitter,
            )
            .await;
        }

        if cancellation.is_cancelled() {
            scheduler.cancel();
        }

        let status = scheduler.terminal_status(cancellation.is_cancelled(), exhausted);
        record.status = status;
        record.ended_at = Some(Utc::now());
        record.usage = ExecutionUsage { total: usage_so_far.max(0).unsigned_abs() };

        let event = Event::ExecutionComplete {
            execution_id: record.id,
            status: status_str(status).to_string(),
            timestamp: Utc::now(),
        };
        emitter.emit(event).await;

        if let Err(err) = self.executions.save(&record).await {
            emitter
                .emit(Event::ExecutionError {
                    execution_id: record.id,
                    error: err.to_string(),
                    timestamp: Utc::now(),
                })
                .await;
        }
    }

    /// Walks the current ready set and greedily sums compute cost against
    /// the organization's remaining budget, stopping at (and not including)
    /// the first node that would not fit. Sets `exhausted` and stops early
    /// if that happens before `open_slots` nodes have been accepted.
    fn budget_limited_batch_size(
        &self,
        workflow: &Workflow,
        scheduler: &Scheduler,
        organization_id: OrganizationId,
        usage_so_far: i64,
        open_slots: usize,
        exhausted: &mut bool,
    ) -> usize {
        let mut projected = usage_so_far;
        let mut accepted = 0;
        for &node_id in scheduler.peek_ready().iter().take(open_slots) {
            let cost = workflow
                .node(node_id)
                .and_then(|node| self.registry.descriptor(node.type_key.as_str()))
                .map(flux_node::NodeDescriptor::effective_compute_cost)
                .unwrap_or(0);
            if !self.usage.has_capacity(organization_id, projected, cost) {
                *exhausted = true;
                break;
            }
            projected += cost;
            accepted += 1;
        }
        accepted
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch_one(
        &self,
        workflow: &Arc<Workflow>,
        record: &mut ExecutionRecord,
        node_id: NodeId,
        submitted: &SubmittedParameters,
        completed_outputs: &HashMap<NodeId, HashMap<String, ParameterValue>>,
        usage_so_far: i64,
        empty_params: &HashMap<String, ParameterValue>,
        mode: ExecutionMode,
        cancellation: CancellationToken,
        emitter: &EventEmitter,
        in_flight: &mut JoinSet<(NodeId, ExecutorOutcome)>,
    ) {
        let Some(node_def) = workflow.node(node_id).cloned() else {
            return;
        };

        let runtime_node = match self.registry.create(node_def.type_key.as_str()) {
            Ok(node) => node,
            Err(err) => {
                self.fail_unstarted(node_id, err.to_string(), record, emitter).await;
                return;
            }
        };

        emitter.emit(Event::NodeStart { node_id, timestamp: Utc::now() }).await;
        if let Some(entry) = record.node_executions.get_mut(&node_id) {
            entry.status = NodeExecutionStatus::Executing;
        }

        let workflow = Arc::clone(workflow);
        let node_def_owned = node_def;
        let submitted_params = submitted.get(&node_id).cloned().unwrap_or_else(|| empty_params.clone());
        let completed_snapshot = completed_outputs.clone();
        let env = self.env.clone();
        let object_store = Arc::clone(&self.object_store);
        let usage = Arc::clone(&self.usage);
        let executor = Arc::clone(&self.executor);
        let organization_id = record.organization_id;
        let workflow_id = record.workflow_id;
        let execution_id = record.id;

        in_flight.spawn(async move {
            let dispatch = NodeDispatch {
                runtime_node,
                node_def: &node_def_owned,
                workflow: workflow.as_ref(),
                workflow_id,
                organization_id,
                execution_id,
                mode,
                completed_outputs: &completed_snapshot,
                submitted_params: &submitted_params,
                env: &env,
                object_store,
                usage_ledger: usage.as_ref(),
                usage_so_far,
                cancellation,
            };
            let outcome = executor.dispatch(dispatch).await;
            (node_id, outcome)
        });
    }

    /// A node that never reached the executor (an unknown type key):
    /// records the failure and propagates skips exactly as
    /// [`Self::record_outcome`] would for a [`ExecutorOutcome::Failed`].
    async fn fail_unstarted(
        &self,
        node_id: NodeId,
        message: String,
        record: &mut ExecutionRecord,
        emitter: &EventEmitter,
    ) {
        emitter.emit(Event::NodeError { node_id, error: message.clone(), timestamp: Utc::now() }).await;
        if let Some(entry) = record.node_executions.get_mut(&node_id) {
            entry.status = NodeExecutionStatus::Error;
            entry.error = Some(message);
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn record_outcome(
        &self,
        node_id: NodeId,
        outcome: ExecutorOutcome,
        scheduler: &mut Scheduler,
        record: &mut ExecutionRecord,
        completed_outputs: &mut HashMap<NodeId, HashMap<String, ParameterValue>>,
        usage_so_far: &mut i64,
        cancellation: &CancellationToken,
        emitter: &EventEmitter,
    ) {
        match outcome {
            ExecutorOutcome::Completed { outputs, usage } => {
                let update = scheduler.record_completion(node_id);
                *usage_so_far += usage;
                if let Err(err) = self.usage.commit(record.organization_id, usage) {
                    tracing::warn!(%err, node_id = %node_id, "usage commit rejected");
                }

                let json_outputs: HashMap<String, serde_json::Value> =
                    outputs.iter().map(|(name, value)| (name.clone(), value_to_json(value))).collect();
                emitter
                    .emit(Event::NodeComplete { node_id, outputs: json_outputs, timestamp: Utc::now() })
                    .await;

                if let Some(entry) = record.node_executions.get_mut(&node_id) {
                    entry.status = NodeExecutionStatus::Completed;
                    entry.outputs = Some(outputs.clone());
                }
                completed_outputs.insert(node_id, outputs);
                record.usage.total = (*usage_so_far).max(0).unsigned_abs();

                // `update.newly_ready` needs no bookkeeping here: the
                // scheduler's own `Ready` state is what the next dispatch
                // round reads, and `NodeExecutionStatus` has no separate
                // "ready" variant to mirror it into.
                let _ = update.newly_ready;
            }
            ExecutorOutcome::Failed { message } => {
                let cancelled_unwind = cancellation.is_cancelled() && message == "cancelled";
                emitter.emit(Event::NodeError { node_id, error: message.clone(), timestamp: Utc::now() }).await;

                if cancelled_unwind {
                    if let Some(entry) = record.node_executions.get_mut(&node_id) {
                        entry.status = NodeExecutionStatus::Error;
                        entry.error = Some(message);
                    }
                    return;
                }

                let update = scheduler.record_failure(node_id);
                if let Some(entry) = record.node_executions.get_mut(&node_id) {
                    entry.status = NodeExecutionStatus::Error;
                    entry.error = Some(message);
                }
                for skipped in update.newly_skipped {
                    emitter
                        .emit(Event::NodeSkip {
                            node_id: skipped,
                            reason: format!("upstream node {node_id} failed"),
                            timestamp: Utc::now(),
                        })
                        .await;
                    if let Some(entry) = record.node_executions.get_mut(&skipped) {
                        entry.status = NodeExecutionStatus::Skipped;
                    }
                }
            }
            ExecutorOutcome::BudgetExhausted => {
                // The pre-dispatch check already screens budget for every
                // node this engine hands out; reaching this arm means the
                // budget was consumed by a sibling node that committed
                // usage between the check and this one's own internal
                // recheck. Treat it the same as a node never dispatched.
                if let Some(entry) = record.node_executions.get_mut(&node_id) {
                    entry.status = NodeExecutionStatus::Idle;
                }
            }
        }
    }

}

fn status_str(status: ExecutionStatus) -> &'static str {
    match status {
        ExecutionStatus::Idle => "idle",
        ExecutionStatus::Submitted => "submitted",
        ExecutionStatus::Executing => "executing",
        ExecutionStatus::Completed => "completed",
        ExecutionStatus::Error => "error",
        ExecutionStatus::Cancelled => "cancelled",
        ExecutionStatus::Exhausted => "exhausted",
    }
}

/// Renders a (wire-form) parameter value as JSON for an event payload.
/// Secrets never leave the process this way.
pub(crate) fn value_to_json(value: &ParameterValue) -> serde_json::Value {
    match value {
        ParameterValue::String(s) => serde_json::Value::String(s.clone()),
        ParameterValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ParameterValue::Boolean(b) => serde_json::Value::Bool(*b),
        ParameterValue::Date(d) => serde_json::Value::String(d.to_rfc3339()),
        ParameterValue::Json(v) | ParameterValue::GeoJson(v) | ParameterValue::Any(v) => v.clone(),
        ParameterValue::Image(b)
        | ParameterValue::Audio(b)
        | ParameterValue::Document(b)
        | ParameterValue::Blob(b)
        | ParameterValue::Gltf(b)
        | ParameterValue::BufferGeometry(b) => binary_to_json(b),
        ParameterValue::Secret(_) => serde_json::Value::String("<redacted>".to_string()),
    }
}

fn binary_to_json(value: &BinaryValue) -> serde_json::Value {
    match value {
        BinaryValue::Ref(r#ref) => serde_json::json!({ "id": r#ref.id, "mimeType": r#ref.mime_type }),
        BinaryValue::Resolved { source, .. } => {
            serde_json::json!({ "id": source.id, "mimeType": source.mime_type })
        }
        BinaryValue::Fresh(bytes) => serde_json::json!({ "mimeType": bytes.mime_type }),
    }
}
