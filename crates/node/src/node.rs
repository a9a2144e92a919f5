//! The uniform contract every executable node satisfies.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::NodeContext;
use crate::descriptor::NodeDescriptor;
use crate::error::NodeError;
use crate::result::NodeOutput;

/// A single operation, `execute(context) -> result`. Nodes never throw to
/// the scheduler: any failure, including a panic-worthy one in another
/// language, is translated into `Err(NodeError)` here.
#[async_trait]
pub trait Node: Send + Sync + std::fmt::Debug {
    fn descriptor(&self) -> &NodeDescriptor;

    async fn execute(&self, context: NodeContext) -> Result<NodeOutput, NodeError>;
}

/// Yields executable [`Node`] instances for one node type. The registry
/// holds one factory per type; a workflow may place many nodes of the same
/// type, each getting its own instance.
pub trait NodeFactory: Send + Sync {
    fn descriptor(&self) -> &NodeDescriptor;

    fn create(&self) -> Arc<dyn Node>;
}

#[cfg(test)]
mod object_safety {
    use super::{Node, NodeFactory};

    fn _assert_node_object_safe(_: &dyn Node) {}
    fn _assert_node_boxed(_: Box<dyn Node>) {}
    fn _assert_factory_object_safe(_: &dyn NodeFactory) {}
}
