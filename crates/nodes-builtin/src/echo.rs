//! `echo` — a source node with no required inputs, used as the `src` node
//! in fan-out/fan-in tests: emits whatever `value` it was given (via a
//! submitted parameter or its default) unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use flux_core::Key;
use flux_node::{Node, NodeContext, NodeDescriptor, NodeError, NodeFactory, NodeOutput};
use flux_parameter::{ParameterDecl, ParameterKind, ParameterValue};

fn key(s: &str) -> Key {
    Key::new(s).expect("literal node keys are valid")
}

fn descriptor() -> NodeDescriptor {
    NodeDescriptor::new(key("echo"), "Echo")
        .with_description("Emits its `value` input unchanged as `value`")
        .with_inputs(vec![
            ParameterDecl::new(key("value"), ParameterKind::Number).with_default(ParameterValue::Number(0.0)),
        ])
        .with_outputs(vec![ParameterDecl::new(key("value"), ParameterKind::Number)])
        .with_compute_cost(1)
}

#[derive(Debug)]
pub struct EchoNode(NodeDescriptor);

impl EchoNode {
    #[must_use]
    pub fn new() -> Self {
        Self(descriptor())
    }
}

impl Default for EchoNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for EchoNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.0
    }

    async fn execute(&self, context: NodeContext) -> Result<NodeOutput, NodeError> {
        let value = match context.input("value") {
            Some(value) => value.clone(),
            None => ParameterValue::Number(0.0),
        };
        Ok(NodeOutput::new().with_output("value", value))
    }
}

pub(crate) struct EchoFactory(NodeDescriptor);

impl EchoFactory {
    pub(crate) fn new() -> Self {
        Self(descriptor())
    }
}

impl NodeFactory for EchoFactory {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.0
    }

    fn create(&self) -> Arc<dyn Node> {
        Arc::new(EchoNode::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_core::{ExecutionId, NodeId, OrganizationId, WorkflowId};
    use flux_node::{ExecutionMode, NodeInput};
    use std::collections::HashMap;

    #[tokio::test]
    async fn emits_its_value_input_unchanged() {
        let mut inputs = HashMap::new();
        inputs.insert("value".to_string(), NodeInput::Single(ParameterValue::Number(10.0)));
        let ctx = NodeContext::new(
            NodeId::v4(),
            WorkflowId::v4(),
            OrganizationId::v4(),
            ExecutionId::v4(),
            ExecutionMode::Test,
        )
        .with_inputs(inputs);

        let output = EchoNode::new().execute(ctx).await.unwrap();
        assert_eq!(output.outputs.get("value"), Some(&ParameterValue::Number(10.0)));
    }

    #[tokio::test]
    async fn defaults_to_zero_with_no_input() {
        let ctx = NodeContext::new(
            NodeId::v4(),
            WorkflowId::v4(),
            OrganizationId::v4(),
            ExecutionId::v4(),
            ExecutionMode::Test,
        );
        let output = EchoNode::new().execute(ctx).await.unwrap();
        assert_eq!(output.outputs.get("value"), Some(&ParameterValue::Number(0.0)));
    }
}
