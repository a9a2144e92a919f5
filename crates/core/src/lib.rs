//! Shared identifiers and validated key types for the Flux workflow engine.
//!
//! Every other crate in this workspace depends on `flux-core` for two things:
//! strongly-typed ids ([`id`]) so an `ExecutionId` and a `NodeId` can never be
//! swapped by accident, and [`Key`] so node/parameter names are validated once
//! and trusted everywhere after.

mod key;

pub mod id;

pub use id::{
    DeploymentId, ExecutionId, NodeExecutionId, NodeId, ObjectId, OrganizationId, UuidParseError,
    WorkflowId,
};
pub use key::{Key, KeyError};
