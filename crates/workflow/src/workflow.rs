//! The top-level workflow definition: a DAG of typed nodes and edges.

use flux_core::WorkflowId;
use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::node::Node;
use crate::trigger::Trigger;

/// `(id, name, trigger, nodes, edges)`.
///
/// Immutable during a single execution: the executor reads a snapshot at
/// submission time (see [`crate::validate`] for the DAG invariant this type
/// does not itself enforce).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    pub trigger: Trigger,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Workflow {
    #[must_use]
    pub fn new(id: WorkflowId, name: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            id,
            name: name.into(),
            trigger,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    #[must_use]
    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }

    #[must_use]
    pub fn node(&self, id: flux_core::NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges whose `target_node` is `id`, in declaration order — the order
    /// a `repeated` input's sequence is gathered in.
    #[must_use]
    pub fn incoming_edges(&self, id: flux_core::NodeId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.target_node == id).collect()
    }

    #[must_use]
    pub fn outgoing_edges(&self, id: flux_core::NodeId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.source_node == id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_core::{Key, NodeId};
    use flux_parameter::ParameterDecl;
    use flux_parameter::ParameterKind;

    fn key(s: &str) -> Key {
        Key::new(s).unwrap()
    }

    #[test]
    fn incoming_edges_preserve_declaration_order() {
        let target = NodeId::v4();
        let a = NodeId::v4();
        let b = NodeId::v4();
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual).with_edges(vec![
            Edge::new(a, key("out"), target, key("items")),
            Edge::new(b, key("out"), target, key("items")),
        ]);

        let incoming = wf.incoming_edges(target);
        assert_eq!(incoming.len(), 2);
        assert_eq!(incoming[0].source_node, a);
        assert_eq!(incoming[1].source_node, b);
    }

    #[test]
    fn node_lookup_by_id() {
        let id = NodeId::v4();
        let node = Node::new(id, key("add"))
            .with_inputs(vec![ParameterDecl::new(key("a"), ParameterKind::Number)]);
        let wf = Workflow::new(WorkflowId::v4(), "wf", Trigger::Manual).with_nodes(vec![node]);
        assert!(wf.node(id).is_some());
        assert!(wf.node(NodeId::v4()).is_none());
    }
}
