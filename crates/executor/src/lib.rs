//! Drives a single dispatched node through its full lifecycle: budget
//! check, input materialization, deadline-bound execution, and output
//! conversion back to wire form.

mod dispatch;
mod error;
mod input;

pub use dispatch::{ExecutorOutcome, NodeDispatch, NodeExecutor};
pub use error::ExecutorError;
pub use input::materialize_inputs;
