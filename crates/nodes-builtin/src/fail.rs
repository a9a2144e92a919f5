//! `fail` — always returns `NodeError::failed`, used as a failing middle
//! node in a chain (`A -> B -> C`, `B` returns `error("boom")`).

use std::sync::Arc;

use async_trait::async_trait;
use flux_core::Key;
use flux_node::{Node, NodeContext, NodeDescriptor, NodeError, NodeFactory, NodeOutput};
use flux_parameter::{ParameterDecl, ParameterKind, ParameterValue};

fn key(s: &str) -> Key {
    Key::new(s).expect("literal node keys are valid")
}

fn descriptor() -> NodeDescriptor {
    NodeDescriptor::new(key("fail"), "Fail")
        .with_description("Always returns an error; used to exercise skip propagation")
        .with_inputs(vec![
            ParameterDecl::new(key("upstream"), ParameterKind::Any),
            ParameterDecl::new(key("message"), ParameterKind::String)
                .with_default(ParameterValue::String("boom".to_string())),
        ])
        .with_outputs(vec![ParameterDecl::new(key("result"), ParameterKind::Any)])
        .with_compute_cost(1)
}

#[derive(Debug)]
pub struct FailNode(NodeDescriptor);

impl FailNode {
    #[must_use]
    pub fn new() -> Self {
        Self(descriptor())
    }
}

impl Default for FailNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for FailNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.0
    }

    async fn execute(&self, context: NodeContext) -> Result<NodeOutput, NodeError> {
        let message = match context.input("message") {
            Some(ParameterValue::String(s)) => s.clone(),
            _ => "boom".to_string(),
        };
        Err(NodeError::failed(message))
    }
}

pub(crate) struct FailFactory(NodeDescriptor);

impl FailFactory {
    pub(crate) fn new() -> Self {
        Self(descriptor())
    }
}

impl NodeFactory for FailFactory {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.0
    }

    fn create(&self) -> Arc<dyn Node> {
        Arc::new(FailNode::new())
    }
}
