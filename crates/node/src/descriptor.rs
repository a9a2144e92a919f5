//! [`NodeDescriptor`]: the catalog entry for a node type, independent of
//! any particular workflow.

use flux_core::Key;
use flux_parameter::ParameterDecl;

/// `(id, displayName, description, tags, inputs, outputs, computeCost?,
/// inlinable?, asTool?, compatibility?)`.
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    pub type_key: Key,
    pub display_name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub inputs: Vec<ParameterDecl>,
    pub outputs: Vec<ParameterDecl>,
    pub compute_cost: Option<i64>,
    pub inlinable: bool,
    pub as_tool: bool,
    pub compatibility: Option<String>,
}

impl NodeDescriptor {
    #[must_use]
    pub fn new(type_key: Key, display_name: impl Into<String>) -> Self {
        Self {
            type_key,
            display_name: display_name.into(),
            description: String::new(),
            tags: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            compute_cost: None,
            inlinable: false,
            as_tool: false,
            compatibility: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
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
    pub fn with_compute_cost(mut self, cost: i64) -> Self {
        self.compute_cost = Some(cost);
        self
    }

    /// `descriptor.computeCost ?? 0` — the executor's default when neither
    /// the node's result nor the descriptor specifies a cost.
    #[must_use]
    pub fn effective_compute_cost(&self) -> i64 {
        self.compute_cost.unwrap_or(0).max(0)
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
