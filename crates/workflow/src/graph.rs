//! [`DependencyGraph`]: a dense-index adjacency view over a [`Workflow`],
//! built once per execution and shared by the validator (cycle check) and
//! the scheduler (ready-set expansion).

use std::collections::HashMap;

use flux_core::NodeId;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::workflow::Workflow;

/// Adjacency over a workflow's node ids, indexed densely (not by `NodeId`
/// hashing) for the scheduler's hot loop.
pub struct DependencyGraph {
    graph: DiGraph<NodeId, ()>,
    index_of: HashMap<NodeId, NodeIndex>,
}

impl DependencyGraph {
    #[must_use]
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let mut graph = DiGraph::new();
        let mut index_of = HashMap::with_capacity(workflow.nodes.len());

        for node in &workflow.nodes {
            let idx = graph.add_node(node.id);
            index_of.insert(node.id, idx);
        }

        for edge in &workflow.edges {
            if let (Some(&source), Some(&target)) =
                (index_of.get(&edge.source_node), index_of.get(&edge.target_node))
            {
                graph.add_edge(source, target, ());
            }
        }

        Self { graph, index_of }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.index_of.contains_key(&node_id)
    }

    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.graph.node_weights().copied().collect()
    }

    #[must_use]
    pub fn in_degree(&self, node_id: NodeId) -> usize {
        let Some(&idx) = self.index_of.get(&node_id) else {
            return 0;
        };
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    #[must_use]
    pub fn successors(&self, node_id: NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.index_of.get(&node_id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect()
    }

    #[must_use]
    pub fn predecessors(&self, node_id: NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.index_of.get(&node_id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n])
            .collect()
    }

    /// Every node transitively reachable from `node_id`, following edges
    /// forward. Used by the scheduler to mark skip propagation.
    #[must_use]
    pub fn reachable_from(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut stack = self.successors(node_id);
        let mut seen = std::collections::HashSet::new();
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            visited.push(next);
            stack.extend(self.successors(next));
        }
        visited
    }

    /// Kahn's algorithm: returns the nodes it could order, in the order it
    /// peeled them off. If the returned `Vec`'s length is less than
    /// [`Self::node_count`], the graph has a cycle — the caller compares
    /// lengths rather than this function reporting the cycle itself, per
    /// the check below.
    #[must_use]
    pub fn topological_order(&self) -> Vec<NodeId> {
        let mut in_degree: HashMap<NodeId, usize> =
            self.node_ids().into_iter().map(|id| (id, self.in_degree(id))).collect();

        let mut ready: Vec<NodeId> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&id, _)| id)
            .collect();
        ready.sort_by_key(NodeId::to_string);

        let mut order = Vec::with_capacity(in_degree.len());
        while let Some(node_id) = ready.pop() {
            order.push(node_id);
            let mut newly_ready = Vec::new();
            for successor in self.successors(node_id) {
                if let Some(deg) = in_degree.get_mut(&successor) {
                    *deg -= 1;
                    if *deg == 0 {
                        newly_ready.push(successor);
                    }
                }
            }
            newly_ready.sort_by_key(NodeId::to_string);
            ready.extend(newly_ready);
            ready.sort_by_key(NodeId::to_string);
        }

        order
    }
}
