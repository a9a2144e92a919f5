//! Ready-set scheduling over a [`DependencyGraph`].
//!
//! The loop the engine drives looks like:
//!
//! 1. [`Scheduler::next_ready_batch`] hands out up to `max` nodes whose
//!    dependencies have all completed.
//! 2. The executor runs each one and reports back through
//!    [`Scheduler::record_completion`] or [`Scheduler::record_failure`].
//! 3. On failure, every node transitively reachable from the failed one is
//!    marked [`NodeState::Skipped`] and will never appear in a ready batch.
//! 4. The loop ends when [`Scheduler::has_pending_work`] goes false; the
//!    engine then asks [`Scheduler::terminal_status`] for the execution's
//!    final status.
//!
//! Ties among equally-ready nodes are broken by the string form of their
//! id, matching [`DependencyGraph::topological_order`]'s own tie-break so
//! dispatch order is reproducible across runs of the same graph.

use std::collections::HashMap;

use flux_core::NodeId;
use flux_workflow::{DependencyGraph, ExecutionStatus, Workflow};

use crate::state::{NodeState, SchedulingUpdate};

pub struct Scheduler {
    graph: DependencyGraph,
    remaining_in_degree: HashMap<NodeId, usize>,
    state: HashMap<NodeId, NodeState>,
    ready: Vec<NodeId>,
    cancelled: bool,
}

impl Scheduler {
    #[must_use]
    pub fn new(workflow: &Workflow) -> Self {
        let graph = DependencyGraph::from_workflow(workflow);
        let mut remaining_in_degree = HashMap::with_capacity(graph.node_count());
        let mut state = HashMap::with_capacity(graph.node_count());
        let mut ready = Vec::new();

        for id in graph.node_ids() {
            let degree = graph.in_degree(id);
            remaining_in_degree.insert(id, degree);
            if degree == 0 {
                state.insert(id, NodeState::Ready);
                ready.push(id);
            } else {
                state.insert(id, NodeState::Pending);
            }
        }
        ready.sort_by_key(NodeId::to_string);

        Self { graph, remaining_in_degree, state, ready, cancelled: false }
    }

    #[must_use]
    pub fn state_of(&self, node_id: NodeId) -> Option<NodeState> {
        self.state.get(&node_id).copied()
    }

    #[must_use]
    pub fn states(&self) -> &HashMap<NodeId, NodeState> {
        &self.state
    }

    /// True while there is still a node to dispatch or a node in flight.
    /// Once this goes false the engine has nothing left to wait on.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.ready.is_empty() || self.state.values().any(|s| *s == NodeState::Running)
    }

    /// Stops handing out new work. Nodes already `Running` are left alone —
    /// the caller still owns reporting their outcome — but
    /// [`Self::next_ready_batch`] returns an empty batch from here on.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The current ready set, sorted by the same tie-break
    /// [`Self::next_ready_batch`] uses, without marking anything `Running`.
    ///
    /// Lets a caller inspect what would be dispatched next — e.g. to check
    /// budget for a specific node — before committing to it.
    #[must_use]
    pub fn peek_ready(&self) -> &[NodeId] {
        &self.ready
    }

    /// Up to `max` nodes ready to dispatch, marked `Running` as they're
    /// handed out. Returns fewer than `max` (possibly zero) when the ready
    /// set is smaller, or always zero after [`Self::cancel`].
    pub fn next_ready_batch(&mut self, max: usize) -> Vec<NodeId> {
        if self.cancelled || max == 0 {
            return Vec::new();
        }
        let take = max.min(self.ready.len());
        let batch: Vec<NodeId> = self.ready.drain(0..take).collect();
        for &id in &batch {
            self.state.insert(id, NodeState::Running);
        }
        batch
    }

    /// Records that `node_id` finished successfully, decrementing every
    /// successor's unmet-dependency count and promoting any that reach zero
    /// to `Ready`.
    pub fn record_completion(&mut self, node_id: NodeId) -> SchedulingUpdate {
        self.state.insert(node_id, NodeState::Completed);

        let mut newly_ready = Vec::new();
        for successor in self.graph.successors(node_id) {
            let Some(degree) = self.remaining_in_degree.get_mut(&successor) else {
                continue;
            };
            *degree = degree.saturating_sub(1);
            if *degree == 0 && self.state.get(&successor) == Some(&NodeState::Pending) {
                self.state.insert(successor, NodeState::Ready);
                newly_ready.push(successor);
            }
        }
        newly_ready.sort_by_key(NodeId::to_string);
        self.ready.extend(newly_ready.iter().copied());
        self.ready.sort_by_key(NodeId::to_string);

        SchedulingUpdate { newly_ready, newly_skipped: Vec::new() }
    }

    /// Records that `node_id` errored, then marks every node transitively
    /// reachable from it as `Skipped`. A node
    /// already terminal is left as-is.
    pub fn record_failure(&mut self, node_id: NodeId) -> SchedulingUpdate {
        self.state.insert(node_id, NodeState::Error);

        let mut newly_skipped = Vec::new();
        for descendant in self.graph.reachable_from(node_id) {
            let current = self.state.get(&descendant).copied().unwrap_or(NodeState::Pending);
            if !current.is_terminal() {
                self.state.insert(descendant, NodeState::Skipped);
                newly_skipped.push(descendant);
            }
        }
        newly_skipped.sort_by_key(NodeId::to_string);
        let skipped: std::collections::HashSet<NodeId> = newly_skipped.iter().copied().collect();
        self.ready.retain(|id| !skipped.contains(id));

        SchedulingUpdate { newly_ready: Vec::new(), newly_skipped }
    }

    /// The execution's final status once [`Self::has_pending_work`] is
    /// false, per this precedence: an errored node wins
    /// over a requested cancellation, which wins over budget exhaustion.
    #[must_use]
    pub fn terminal_status(&self, cancel_requested: bool, exhausted: bool) -> ExecutionStatus {
        if self.state.values().any(|s| *s == NodeState::Error) {
            ExecutionStatus::Error
        } else if cancel_requested {
            ExecutionStatus::Cancelled
        } else if exhausted {
            ExecutionStatus::Exhausted
        } else {
            ExecutionStatus::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_core::{Key, WorkflowId};
    use flux_workflow::{Edge, Node, Trigger};

    fn key(s: &str) -> Key {
        Key::new(s).unwrap()
    }

    fn node(id: NodeId) -> Node {
        Node::new(id, key("n"))
    }

    #[test]
    fn roots_are_ready_immediately() {
        let a = NodeId::v4();
        let b = NodeId::v4();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual)
            .with_nodes(vec![node(a), node(b)])
            .with_edges(vec![Edge::new(a, key("out"), b, key("in"))]);

        let scheduler = Scheduler::new(&wf);
        assert_eq!(scheduler.state_of(a), Some(NodeState::Ready));
        assert_eq!(scheduler.state_of(b), Some(NodeState::Pending));
    }

    #[test]
    fn completion_promotes_successor_once_every_dependency_lands() {
        let a = NodeId::v4();
        let b = NodeId::v4();
        let c = NodeId::v4();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual)
            .with_nodes(vec![node(a), node(b), node(c)])
            .with_edges(vec![
                Edge::new(a, key("out"), c, key("in")),
                Edge::new(b, key("out"), c, key("in")),
            ]);

        let mut scheduler = Scheduler::new(&wf);
        let batch = scheduler.next_ready_batch(10);
        assert_eq!(batch.len(), 2);

        let update = scheduler.record_completion(a);
        assert!(update.newly_ready.is_empty());
        assert_eq!(scheduler.state_of(c), Some(NodeState::Pending));

        let update = scheduler.record_completion(b);
        assert_eq!(update.newly_ready, vec![c]);
        assert_eq!(scheduler.state_of(c), Some(NodeState::Ready));
    }

    #[test]
    fn failure_skips_every_transitive_successor() {
        let a = NodeId::v4();
        let b = NodeId::v4();
        let c = NodeId::v4();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual)
            .with_nodes(vec![node(a), node(b), node(c)])
            .with_edges(vec![
                Edge::new(a, key("out"), b, key("in")),
                Edge::new(b, key("out"), c, key("in")),
            ]);

        let mut scheduler = Scheduler::new(&wf);
        scheduler.next_ready_batch(10);
        let update = scheduler.record_failure(a);

        let mut skipped = update.newly_skipped;
        skipped.sort_by_key(NodeId::to_string);
        let mut expected = vec![b, c];
        expected.sort_by_key(NodeId::to_string);
        assert_eq!(skipped, expected);
        assert_eq!(scheduler.state_of(b), Some(NodeState::Skipped));
        assert_eq!(scheduler.state_of(c), Some(NodeState::Skipped));
        assert!(!scheduler.has_pending_work());
    }

    #[test]
    fn every_node_ends_completed_error_or_skipped() {
        let a = NodeId::v4();
        let b = NodeId::v4();
        let c = NodeId::v4();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual)
            .with_nodes(vec![node(a), node(b), node(c)])
            .with_edges(vec![
                Edge::new(a, key("out"), b, key("in")),
                Edge::new(a, key("out2"), c, key("in")),
            ]);

        let mut scheduler = Scheduler::new(&wf);
        scheduler.next_ready_batch(10);
        scheduler.record_failure(a);

        let terminal_count = scheduler.states().values().filter(|s| s.is_terminal()).count();
        assert_eq!(terminal_count, 3);
    }

    #[test]
    fn cancel_stops_further_dispatch_but_not_in_flight_bookkeeping() {
        let a = NodeId::v4();
        let b = NodeId::v4();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual)
            .with_nodes(vec![node(a), node(b)])
            .with_edges(vec![]);

        let mut scheduler = Scheduler::new(&wf);
        scheduler.next_ready_batch(1);
        scheduler.cancel();
        assert!(scheduler.next_ready_batch(10).is_empty());

        scheduler.record_completion(a);
        assert_eq!(scheduler.state_of(a), Some(NodeState::Completed));
    }

    #[test]
    fn terminal_status_precedence_is_error_then_cancelled_then_exhausted() {
        let a = NodeId::v4();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual).with_nodes(vec![node(a)]);
        let mut scheduler = Scheduler::new(&wf);

        assert_eq!(scheduler.terminal_status(true, true), ExecutionStatus::Cancelled);
        assert_eq!(scheduler.terminal_status(false, true), ExecutionStatus::Exhausted);
        assert_eq!(scheduler.terminal_status(false, false), ExecutionStatus::Completed);

        scheduler.next_ready_batch(1);
        scheduler.record_failure(a);
        assert_eq!(scheduler.terminal_status(true, true), ExecutionStatus::Error);
    }

    #[test]
    fn peek_ready_does_not_mutate_state() {
        let a = NodeId::v4();
        let b = NodeId::v4();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual).with_nodes(vec![node(a), node(b)]);

        let scheduler = Scheduler::new(&wf);
        let peeked = scheduler.peek_ready().to_vec();
        assert_eq!(peeked.len(), 2);
        assert_eq!(scheduler.state_of(a), Some(NodeState::Ready));
    }

    #[test]
    fn ready_batch_respects_the_requested_maximum() {
        let ids: Vec<NodeId> = (0..5).map(|_| NodeId::v4()).collect();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual)
            .with_nodes(ids.iter().map(|&id| node(id)).collect());

        let mut scheduler = Scheduler::new(&wf);
        let first = scheduler.next_ready_batch(2);
        assert_eq!(first.len(), 2);
        let second = scheduler.next_ready_batch(10);
        assert_eq!(second.len(), 3);
    }
}
