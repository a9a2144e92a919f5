//! How a workflow execution is kicked off. The core schedules and runs a
//! workflow identically regardless of trigger; this is metadata the
//! collaborator gateway layer (out of scope here) uses to decide when to
//! submit one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trigger {
    Manual,
    Http,
    Email,
    Cron { expression: String },
}
