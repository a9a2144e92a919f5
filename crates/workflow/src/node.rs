//! A node placement within a workflow: its type, its declared I/O, and
//! whatever the authoring UI needs to draw it.

use flux_core::{Key, NodeId};
use flux_parameter::ParameterDecl;
use serde::{Deserialize, Serialize};

/// Canvas coordinates. The engine itself never reads these; they round-trip
/// so the authoring layer can redraw a workflow it loads back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub type_key: Key,
    pub position: Position,
    pub inputs: Vec<ParameterDecl>,
    pub outputs: Vec<ParameterDecl>,
    pub error_tag: Option<String>,
}

impl Node {
    #[must_use]
    pub fn new(id: NodeId, type_key: Key) -> Self {
        Self {
            id,
            type_key,
            position: Position { x: 0.0, y: 0.0 },
            inputs: Vec::new(),
            outputs: Vec::new(),
            error_tag: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    #[must_use]
    pub fn with_inputs(mut self, inputs: Vec<ParameterDecl>) -> Self {
        self.inputs = inputs;
        self
    }

    #[must_use]
    pub fn with_outputs(mut self, outputs: Vec<ParameterDecl>) -> Self {
        self.outputs = outputs;
        self
    }

    #[must_use]
    pub fn input(&self, name: &str) -> Option<&ParameterDecl> {
        self.inputs.iter().find(|decl| decl.name.as_str() == name)
    }

    #[must_use]
    pub fn output(&self, name: &str) -> Option<&ParameterDecl> {
        self.outputs.iter().find(|decl| decl.name.as_str() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_parameter::ParameterKind;

    fn id() -> NodeId {
        NodeId::v4()
    }

    fn key(s: &str) -> Key {
        Key::new(s).unwrap()
    }

    #[test]
    fn builder_sets_inputs_and_outputs() {
        let node = Node::new(id(), Key::new("http.request").unwrap())
            .with_inputs(vec![ParameterDecl::new(key("url"), ParameterKind::String)])
            .with_outputs(vec![ParameterDecl::new(key("body"), ParameterKind::Json)]);
        assert!(node.input("url").is_some());
        assert!(node.output("body").is_some());
        assert!(node.input("missing").is_none());
    }
}
