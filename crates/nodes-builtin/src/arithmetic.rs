//! `add`, `sub`, `mul` — single-operation arithmetic nodes, chained in
//! tests as `add(1+2) -> sub(-1) -> mul(*3) == 6`.

use std::sync::Arc;

use async_trait::async_trait;
use flux_core::Key;
use flux_node::{Node, NodeContext, NodeDescriptor, NodeError, NodeFactory, NodeOutput};
use flux_parameter::{ParameterDecl, ParameterKind, ParameterValue};

fn key(s: &str) -> Key {
    Key::new(s).expect("literal node keys are valid")
}

fn number_input(context: &NodeContext, name: &str) -> Result<f64, NodeError> {
    match context.input(name) {
        Some(ParameterValue::Number(n)) => Ok(*n),
        Some(_) => Err(NodeError::failed(format!("input `{name}` is not a number"))),
        None => Err(NodeError::failed(format!("missing required input `{name}`"))),
    }
}

fn descriptor(type_key: &str, display_name: &str) -> NodeDescriptor {
    NodeDescriptor::new(key(type_key), display_name)
        .with_description(format!("Arithmetic: {display_name} two numbers"))
        .with_inputs(vec![
            ParameterDecl::new(key("a"), ParameterKind::Number).required(),
            ParameterDecl::new(key("b"), ParameterKind::Number).with_default(ParameterValue::Number(0.0)),
        ])
        .with_outputs(vec![ParameterDecl::new(key("result"), ParameterKind::Number)])
        .with_compute_cost(1)
}

macro_rules! arithmetic_node {
    ($node:ident, $factory:ident, $type_key:literal, $display:literal, $op:expr) => {
        #[derive(Debug)]
        pub struct $node(NodeDescriptor);

        impl $node {
            #[must_use]
            pub fn new() -> Self {
                Self(descriptor($type_key, $display))
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
                let a = number_input(&context, "a")?;
                let b = number_input(&context, "b")?;
                let op: fn(f64, f64) -> f64 = $op;
                Ok(NodeOutput::new().with_output("result", ParameterValue::Number(op(a, b))))
            }
        }

        pub(crate) struct $factory(NodeDescriptor);

        impl $factory {
            pub(crate) fn new() -> Self {
                Self(descriptor($type_key, $display))
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

arithmetic_node!(AddNode, AddFactory, "add", "Add", |a, b| a + b);
arithmetic_node!(SubNode, SubFactory, "sub", "Subtract", |a, b| a - b);
arithmetic_node!(MulNode, MulFactory, "mul", "Multiply", |a, b| a * b);
