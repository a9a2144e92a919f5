use flux_core::NodeId;

/// Failures that happen before a node's own `execute` is ever called —
/// preparing its inputs. These surface to the scheduler exactly like a node
/// `error(message)` would.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ExecutorError {
    #[error("missing required input `{name}`")]
    MissingRequiredInput { name: String },

    #[error("upstream output `{output}` from node {node} was never recorded")]
    UpstreamOutputMissing { node: NodeId, output: String },

    #[error(transparent)]
    Parameter(#[from] flux_parameter::ParameterError),
}
