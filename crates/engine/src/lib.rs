//! The top-level orchestrator: wires the scheduler, executor, event bus,
//! persistence adapters, and usage ledger into one submit/stream entry
//! point, plus the three environment variables the core itself reads.
//!
//! Everything that reads a workflow from disk or a real database, serves
//! HTTP, or authenticates a caller is a collaborator outside this crate —
//! see `spec.md` §1. The optional `server` feature adds a minimal `axum` SSE
//! handler over [`Engine`] matching the wire format of §6.1; it is a demo
//! harness, not a production gateway (no auth, no rate limiting).

mod config;
mod engine;
mod error;

#[cfg(feature = "server")]
mod sse;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, SubmittedParameters};
pub use error::EngineError;

#[cfg(feature = "server")]
pub use sse::{router, AppState};
