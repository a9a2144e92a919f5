use std::collections::HashMap;

use flux_parameter::ParameterValue;

/// `success(outputs, usageDelta?)` — the other half of a node's result is
/// [`crate::NodeError`], returned directly from `execute` rather than
/// wrapped here.
#[derive(Debug, Clone, Default)]
pub struct NodeOutput {
    pub outputs: HashMap<String, ParameterValue>,
    pub usage_delta: Option<i64>,
}

impl NodeOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output(mut self, name: impl Into<String>, value: ParameterValue) -> Self {
        self.outputs.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_usage_delta(mut self, delta: i64) -> Self {
        self.usage_delta = Some(delta);
        self
    }
}
