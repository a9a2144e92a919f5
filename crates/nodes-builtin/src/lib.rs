//! Sample node implementations used to exercise the engine end to end:
//! arithmetic, fan-out/fan-in, and a node that always fails. These are the
//! fixtures the engine's scenario tests script by name.
//!
//! None of this is meant to ship to users — the real node catalog (hundreds
//! of individual node implementations) is an external collaborator. This
//! crate exists so `flux-engine`'s tests have something to run.

mod arithmetic;
mod echo;
mod fail;
mod fanin;

pub use arithmetic::{AddNode, MulNode, SubNode};
pub use echo::EchoNode;
pub use fail::FailNode;
pub use fanin::{ScaleNode, SumNode, TriplerNode};

use std::sync::Arc;

use flux_node::NodeRegistry;

/// Registers every node type this crate ships under its canonical type key.
pub fn register_all(registry: &mut NodeRegistry) {
    registry.register(Arc::new(arithmetic::AddFactory::new()));
    registry.register(Arc::new(arithmetic::SubFactory::new()));
    registry.register(Arc::new(arithmetic::MulFactory::new()));
    registry.register(Arc::new(echo::EchoFactory::new()));
    registry.register(Arc::new(fail::FailFactory::new()));
    registry.register(Arc::new(fanin::ScaleFactory::new()));
    registry.register(Arc::new(fanin::TriplerFactory::new()));
    registry.register(Arc::new(fanin::SumFactory::new()));
}
