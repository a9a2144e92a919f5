//! A directed connection from one node's output to another's input.

use flux_core::{Key, NodeId};
use serde::{Deserialize, Serialize};

/// `(sourceNode, sourceOutput, targetNode, targetInput)`.
///
/// Validity (checked by [`crate::validate`], not here): both endpoints
/// exist; the named output and input exist on their nodes; the output kind
/// is assignable to the input kind; at most one incoming edge per
/// non-repeated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source_node: NodeId,
    pub source_output: Key,
    pub target_node: NodeId,
    pub target_input: Key,
}

impl Edge {
    #[must_use]
    pub fn new(source_node: NodeId, source_output: Key, target_node: NodeId, target_input: Key) -> Self {
        Self {
            source_node,
            source_output,
            target_node,
            target_input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_with_all_four_fields() {
        let a = NodeId::v4();
        let b = NodeId::v4();
        let edge = Edge::new(a, Key::new("out").unwrap(), b, Key::new("in").unwrap());
        assert_eq!(edge.source_node, a);
        assert_eq!(edge.target_node, b);
    }
}
