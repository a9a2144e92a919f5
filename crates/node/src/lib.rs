//! The node runtime contract: descriptors, execution context, the uniform
//! `Node` trait, and the per-process registry.

mod context;
mod descriptor;
mod error;
mod node;
mod registry;
mod result;

pub use context::{ExecutionMode, IntegrationProvider, NodeContext, NodeInput};
pub use descriptor::NodeDescriptor;
pub use error::NodeError;
pub use node::{Node, NodeFactory};
pub use registry::NodeRegistry;
pub use result::NodeOutput;
