//! The six lifecycle event payloads a running execution emits.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use flux_core::{ExecutionId, NodeId};
use serde::{Deserialize, Serialize};

/// A single lifecycle event. JSON-serializable; `outputs` on
/// [`Event::NodeComplete`] is already in wire form (binary parameters
/// resolved to object references) by the time it reaches this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "node-start")]
    NodeStart { node_id: NodeId, timestamp: DateTime<Utc> },

    #[serde(rename = "node-complete")]
    NodeComplete {
        node_id: NodeId,
        outputs: HashMap<String, serde_json::Value>,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "node-error")]
    NodeError {
        node_id: NodeId,
        error: String,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "node-skip")]
    NodeSkip {
        node_id: NodeId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "execution-complete")]
    ExecutionComplete {
        execution_id: ExecutionId,
        status: String,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "execution-error")]
    ExecutionError {
        execution_id: ExecutionId,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    /// The SSE `event:` field — matches the `type` tag without re-parsing
    /// the serialized JSON.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::NodeStart { .. } => "node-start",
            Self::NodeComplete { .. } => "node-complete",
            Self::NodeError { .. } => "node-error",
            Self::NodeSkip { .. } => "node-skip",
            Self::ExecutionComplete { .. } => "execution-complete",
            Self::ExecutionError { .. } => "execution-error",
        }
    }

    #[must_use]
    pub fn is_terminal_for_execution(&self) -> bool {
        matches!(self, Self::ExecutionComplete { .. } | Self::ExecutionError { .. })
    }
}

/// An [`Event`] tagged with its position in the stream, so a consumer can
/// detect gaps (a disconnect-and-resubscribe is not supported; the gap
/// detection is purely diagnostic).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SequencedEvent {
    pub seq: u64,
    #[serde(flatten)]
    pub event: Event,
}
