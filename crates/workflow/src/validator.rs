//! Structural validation: everything a workflow must satisfy before an
//! execution record is ever created.

use flux_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::workflow::Workflow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ValidationErrorCode,
    pub message: String,
    pub node_id: Option<NodeId>,
}

impl ValidationError {
    fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            node_id: None,
        }
    }

    fn on_node(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    UnknownNode,
    UnknownParameter,
    TypeMismatch,
    InvalidConnection,
    CycleDetected,
}

/// Runs six structural checks, in order, collecting every
/// failure rather than stopping at the first so the caller can surface them
/// all in one round trip.
///
/// # Errors
///
/// Returns every [`ValidationError`] found; `Ok(())` iff the workflow is
/// structurally valid.
pub fn validate(workflow: &Workflow) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for edge in &workflow.edges {
        let source = workflow.node(edge.source_node);
        let target = workflow.node(edge.target_node);

        let (Some(source), Some(target)) = (source, target) else {
            if source.is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorCode::UnknownNode,
                    format!("edge source node {} does not exist", edge.source_node),
                ));
            }
            if target.is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorCode::UnknownNode,
                    format!("edge target node {} does not exist", edge.target_node),
                ));
            }
            continue;
        };

        let source_output = source.output(edge.source_output.as_str());
        let target_input = target.input(edge.target_input.as_str());

        let (Some(source_output), Some(target_input)) = (source_output, target_input) else {
            if source_output.is_none() {
                errors.push(
                    ValidationError::new(
                        ValidationErrorCode::UnknownParameter,
                        format!("node {} has no output named '{}'", source.id, edge.source_output),
                    )
                    .on_node(source.id),
                );
            }
            if target_input.is_none() {
                errors.push(
                    ValidationError::new(
                        ValidationErrorCode::UnknownParameter,
                        format!("node {} has no input named '{}'", target.id, edge.target_input),
                    )
                    .on_node(target.id),
                );
            }
            continue;
        };

        if !source_output.kind.is_assignable_to(target_input.kind) {
            errors.push(
                ValidationError::new(
                    ValidationErrorCode::TypeMismatch,
                    format!(
                        "{}.{} ({:?}) is not assignable to {}.{} ({:?})",
                        source.id,
                        edge.source_output,
                        source_output.kind,
                        target.id,
                        edge.target_input,
                        target_input.kind
                    ),
                )
                .on_node(target.id),
            );
        }
    }

    for node in &workflow.nodes {
        for input in &node.inputs {
            let incoming: Vec<_> = workflow
                .incoming_edges(node.id)
                .into_iter()
                .filter(|e| e.target_input == input.name)
                .collect();

            if !input.repeated && incoming.len() > 1 {
                errors.push(
                    ValidationError::new(
                        ValidationErrorCode::InvalidConnection,
                        format!(
                            "non-repeated input '{}' on node {} has {} incoming edges",
                            input.name,
                            node.id,
                            incoming.len()
                        ),
                    )
                    .on_node(node.id),
                );
            }

            if input.required && incoming.is_empty() && !input.has_default() {
                errors.push(
                    ValidationError::new(
                        ValidationErrorCode::InvalidConnection,
                        format!(
                            "required input '{}' on node {} has no incoming edge and no default",
                            input.name, node.id
                        ),
                    )
                    .on_node(node.id),
                );
            }
        }
    }

    let graph = DependencyGraph::from_workflow(workflow);
    if graph.topological_order().len() < graph.node_count() {
        errors.push(ValidationError::new(
            ValidationErrorCode::CycleDetected,
            "workflow contains a cycle",
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
