use flux_core::NodeId;

/// Where a node sits in the run's scheduling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// At least one dependency has not completed.
    Pending,
    /// Every dependency completed; waiting for a dispatch slot.
    Ready,
    /// Dispatched to the executor, outcome not yet recorded.
    Running,
    Completed,
    Error,
    /// Unreachable because an upstream node in its path errored.
    Skipped,
}

impl NodeState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Skipped)
    }
}

/// What changed in the graph as a result of recording one node's outcome.
#[derive(Debug, Default, Clone)]
pub struct SchedulingUpdate {
    /// Nodes whose last unmet dependency just completed.
    pub newly_ready: Vec<NodeId>,
    /// Nodes that can now never run because a node upstream of them failed.
    pub newly_skipped: Vec<NodeId>,
}
