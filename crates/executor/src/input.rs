//! Input materialization: merging literal defaults, workflow-provided
//! parameters, and upstream outputs into the map a node actually sees.
//!
//! Precedence for a non-`repeated` input, highest first: an incoming edge's
//! upstream output, then a workflow-submission-time parameter, then the
//! declaration's own default. All three sources are checked without
//! ranking them; this is the resolution recorded in DESIGN.md.

use std::collections::HashMap;

use flux_core::NodeId;
use flux_node::NodeInput;
use flux_parameter::ParameterValue;
use flux_workflow::{Node as WorkflowNode, Workflow};

use crate::error::ExecutorError;

pub fn materialize_inputs(
    node: &WorkflowNode,
    workflow: &Workflow,
    completed_outputs: &HashMap<NodeId, HashMap<String, ParameterValue>>,
    submitted_params: &HashMap<String, ParameterValue>,
) -> Result<HashMap<String, NodeInput>, ExecutorError> {
    let mut inputs = HashMap::with_capacity(node.inputs.len());

    for decl in &node.inputs {
        let incoming: Vec<_> = workflow
            .incoming_edges(node.id)
            .into_iter()
            .filter(|edge| edge.target_input.as_str() == decl.name.as_str())
            .collect();

        if decl.repeated {
            let mut sequence = Vec::with_capacity(incoming.len());
            for edge in &incoming {
                let value = upstream_output(completed_outputs, edge.source_node, edge.source_output.as_str())?;
                sequence.push(value);
            }
            if decl.required && sequence.is_empty() {
                return Err(ExecutorError::MissingRequiredInput { name: decl.name.to_string() });
            }
            inputs.insert(decl.name.to_string(), NodeInput::Sequence(sequence));
            continue;
        }

        let value = if let Some(edge) = incoming.first() {
            Some(upstream_output(completed_outputs, edge.source_node, edge.source_output.as_str())?)
        } else if let Some(value) = submitted_params.get(decl.name.as_str()) {
            Some(value.clone())
        } else {
            decl.default_value.clone()
        };

        match value {
            Some(value) => {
                inputs.insert(decl.name.to_string(), NodeInput::Single(value));
            }
            None if decl.required => {
                return Err(ExecutorError::MissingRequiredInput { name: decl.name.to_string() });
            }
            None => {}
        }
    }

    Ok(inputs)
}

fn upstream_output(
    completed_outputs: &HashMap<NodeId, HashMap<String, ParameterValue>>,
    source_node: NodeId,
    source_output: &str,
) -> Result<ParameterValue, ExecutorError> {
    completed_outputs
        .get(&source_node)
        .and_then(|outputs| outputs.get(source_output))
        .cloned()
        .ok_or_else(|| ExecutorError::UpstreamOutputMissing {
            node: source_node,
            output: source_output.to_string(),
        })
}
