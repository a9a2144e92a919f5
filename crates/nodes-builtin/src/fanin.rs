//! `doubler`, `tripler`, `sum` — fan-out/fan-in test fixtures: `src` emits
//! `10`; `doubler` and `tripler` both consume it; `sum` (a `repeated`
//! input) adds their results back together.

use std::sync::Arc;

use async_trait::async_trait;
use flux_core::Key;
use flux_node::{Node, NodeContext, NodeDescriptor, NodeError, NodeFactory, NodeOutput};
use flux_parameter::{ParameterDecl, ParameterKind, ParameterValue};

fn key(s: &str) -> Key {
    Key::new(s).expect("literal node keys are valid")
}

fn scale_descriptor(type_key: &str, display_name: &str) -> NodeDescriptor {
    NodeDescriptor::new(key(type_key), display_name)
        .with_description(format!("{display_name}s its `value` input"))
        .with_inputs(vec![ParameterDecl::new(key("value"), ParameterKind::Number).required()])
        .with_outputs(vec![ParameterDecl::new(key("result"), ParameterKind::Number)])
        .with_compute_cost(1)
}

macro_rules! scale_node {
    ($node:ident, $factory:ident, $type_key:literal, $display:literal, $factor:literal) => {
        #[derive(Debug)]
        pub struct $node(NodeDescriptor);

        impl $node {
            #[must_use]
            pub fn new() -> Self {
                Self(scale_descriptor($type_key, $display))
            }
        }

        impl Default for $node {
            fn default() -> Self {
                Self::new()
            }
        }

        #[async_trait]
        impl Node for $node {
            fn descriptor(&self) -> &NodeDescriptor {
                &self.0
            }

            async fn execute(&self, context: NodeContext) -> Result<NodeOutput, NodeError> {
                let value = match context.input("value") {
                    Some(ParameterValue::Number(n)) => *n,
                    _ => return Err(NodeError::failed("missing required input `value`")),
                };
                Ok(NodeOutput::new().with_output("result", ParameterValue::Number(value * $factor)))
            }
        }

        pub(crate) struct $factory(NodeDescriptor);

        impl $factory {
            pub(crate) fn new() -> Self {
                Self(scale_descriptor($type_key, $display))
            }
        }

        impl NodeFactory for $factory {
            fn descriptor(&self) -> &NodeDescriptor {
                &self.0
            }

            fn create(&self) -> Arc<dyn Node> {
                Arc::new($node::new())
            }
        }
    };
}

scale_node!(ScaleNode, ScaleFactory, "doubler", "Doubler", 2.0);

#[derive(Debug)]
pub struct TriplerNode(NodeDescriptor);

impl TriplerNode {
    #[must_use]
    pub fn new() -> Self {
        Self(scale_descriptor("tripler", "Tripler"))
    }
}

impl Default for TriplerNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for TriplerNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.0
    }

    async fn execute(&self, context: NodeContext) -> Result<NodeOutput, NodeError> {
        let value = match context.input("value") {
            Some(ParameterValue::Number(n)) => *n,
            _ => return Err(NodeError::failed("missing required input `value`")),
        };
        Ok(NodeOutput::new().with_output("result", ParameterValue::Number(value * 3.0)))
    }
}

pub(crate) struct TriplerFactory(NodeDescriptor);

impl TriplerFactory {
    pub(crate) fn new() -> Self {
        Self(scale_descriptor("tripler", "Tripler"))
    }
}

impl NodeFactory for TriplerFactory {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.0
    }

    fn create(&self) -> Arc<dyn Node> {
        Arc::new(TriplerNode::new())
    }
}

fn sum_descriptor() -> NodeDescriptor {
    NodeDescriptor::new(key("sum"), "Sum")
        .with_description("Sums a `repeated` sequence of numbers")
        .with_inputs(vec![ParameterDecl::new(key("values"), ParameterKind::Number).repeated()])
        .with_outputs(vec![ParameterDecl::new(key("result"), ParameterKind::Number)])
        .with_compute_cost(1)
}

#[derive(Debug)]
pub struct SumNode(NodeDescriptor);

impl SumNode {
    #[must_use]
    pub fn new() -> Self {
        Self(sum_descriptor())
    }
}

impl Default for SumNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for SumNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.0
    }

    async fn execute(&self, context: NodeContext) -> Result<NodeOutput, NodeError> {
        let values = context.input_sequence("values").unwrap_or_default();
        let mut total = 0.0;
        for value in values {
            match value {
                ParameterValue::Number(n) => total += *n,
                other => return Err(NodeError::failed(format!("non-numeric value in `values`: {other:?}"))),
            }
        }
        Ok(NodeOutput::new().with_output("result", ParameterValue::Number(total)))
    }
}

pub(crate) struct SumFactory(NodeDescriptor);

impl SumFactory {
    pub(crate) fn new() -> Self {
        Self(sum_descriptor())
    }
}

impl NodeFactory for SumFactory {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.0
    }

    fn create(&self) -> Arc<dyn Node> {
        Arc::new(SumNode::new())
    }
}
