//! `flux` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate` — structurally validate a workflow JSON file.
//! - `run`      — submit a workflow for execution and stream its lifecycle
//!   events to stdout in the wire format of `spec.md` §6.1.
//! - `serve`    — start the demo SSE server (behind the `server` feature).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flux_core::OrganizationId;
use flux_engine::{Engine, EngineConfig, SubmittedParameters};
use flux_node::{ExecutionMode, NodeRegistry};
use flux_object_store::InMemoryObjectStore;
use flux_parameter::ParameterValue;
use flux_persistence::{InMemoryExecutionRepo, InMemoryWorkflowRepo, WorkflowRepo};
use flux_usage::{OrgBudget, UsageLedger};
use flux_workflow::Workflow;
use tokio_stream::StreamExt as _;
use tracing::info;

#[derive(Parser)]
#[command(name = "flux", about = "Workflow execution engine CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a workflow definition JSON file against the structural
    /// rules in `spec.md` §4.4, without executing it.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// Submit a workflow for execution and stream its lifecycle events to
    /// stdout until the execution reaches a terminal status.
    Run {
        /// Path to the workflow JSON file.
        path: PathBuf,

        /// Organization id the execution runs under. Defaults to a fresh,
        /// unlimited-budget organization.
        #[arg(long)]
        org: Option<OrganizationId>,

        /// Caps the organization's compute budget for this run.
        #[arg(long)]
        budget: Option<i64>,

        /// A submitted parameter, `nodeId:paramName=jsonValue`, repeatable.
        #[arg(long = "set", value_name = "NODE:PARAM=VALUE")]
        params: Vec<String>,
    },
    /// Start the demo SSE server, exposing the wire format of `spec.md` §6.1
    /// over HTTP. Not meant to be internet-facing on its own.
    #[cfg(feature = "server")]
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => validate(&path),
        Command::Run { path, org, budget, params } => run(&path, org, budget, &params).await,
        #[cfg(feature = "server")]
        Command::Serve { bind } => serve(&bind).await,
    }
}

fn load_workflow(path: &PathBuf) -> Result<Workflow> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read workflow file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid workflow JSON in {}", path.display()))
}

fn validate(path: &PathBuf) -> Result<()> {
    let workflow = load_workflow(path)?;
    match flux_workflow::validate(&workflow) {
        Ok(()) => {
            println!("workflow {} is valid ({} nodes, {} edges)", workflow.id, workflow.nodes.len(), workflow.edges.len());
            Ok(())
        }
        Err(errors) => {
            eprintln!("workflow {} failed validation with {} error(s):", workflow.id, errors.len());
            for error in &errors {
                match error.node_id {
                    Some(node_id) => eprintln!("  [{:?}] node {node_id}: {}", error.code, error.message),
                    None => eprintln!("  [{:?}] {}", error.code, error.message),
                }
            }
            std::process::exit(1);
        }
    }
}

/// Parses `nodeId:paramName=jsonValue` entries into [`SubmittedParameters`].
/// A value that does not parse as JSON is carried as a plain string.
fn parse_params(raw: &[String]) -> Result<SubmittedParameters> {
    let mut submitted: SubmittedParameters = HashMap::new();
    for entry in raw {
        let (target, value) =
            entry.split_once('=').with_context(|| format!("`--set {entry}` is missing `=value`"))?;
        let (node_id, param_name) =
            target.split_once(':').with_context(|| format!("`--set {entry}` is missing `node:param`"))?;
        let node_id = node_id
            .parse()
            .with_context(|| format!("`--set {entry}` has an invalid node id `{node_id}`"))?;
        let parsed = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        submitted.entry(node_id).or_default().insert(param_name.to_string(), json_to_parameter_value(parsed));
    }
    Ok(submitted)
}

fn json_to_parameter_value(value: serde_json::Value) -> ParameterValue {
    match value {
        serde_json::Value::Number(n) => ParameterValue::Number(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => ParameterValue::String(s),
        serde_json::Value::Bool(b) => ParameterValue::Boolean(b),
        other => ParameterValue::Any(other),
    }
}

async fn run(path: &PathBuf, org: Option<OrganizationId>, budget: Option<i64>, params: &[String]) -> Result<()> {
    let workflow = load_workflow(path)?;
    let organization_id = org.unwrap_or_else(OrganizationId::v4);
    let submitted = parse_params(params)?;

    let mut registry = NodeRegistry::new();
    flux_nodes_builtin::register_all(&mut registry);

    let workflows = Arc::new(InMemoryWorkflowRepo::new());
    workflows.insert(workflow.clone());

    let usage = Arc::new(UsageLedger::new());
    if let Some(limit) = budget {
        usage.set_budget(organization_id, OrgBudget::limited(limit));
    }

    let engine = Arc::new(Engine::new(
        EngineConfig::from_env()?,
        Arc::new(registry),
        workflows.clone() as Arc<dyn WorkflowRepo>,
        Arc::new(InMemoryExecutionRepo::new()),
        Arc::new(InMemoryObjectStore::new()),
        usage,
        HashMap::new(),
    ));

    info!(workflow_id = %workflow.id, %organization_id, "submitting workflow for execution");
    let (execution_id, mut stream) = engine.submit(workflow.id, organization_id, ExecutionMode::Production, submitted).await?;
    println!("execution {execution_id} started");

    let mut exit_code = 0;
    while let Some(sequenced) = stream.next().await {
        println!("event: {}", sequenced.event.event_type());
        println!("data: {}", serde_json::to_string(&sequenced.event)?);
        println!("id: {}", sequenced.seq);
        println!();
        if let flux_eventbus::Event::ExecutionError { .. } = &sequenced.event {
            exit_code = 1;
        }
        if let flux_eventbus::Event::ExecutionComplete { status, .. } = &sequenced.event {
            if status != "completed" {
                exit_code = 1;
            }
        }
    }

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

#[cfg(feature = "server")]
async fn serve(bind: &str) -> Result<()> {
    use flux_engine::{router, AppState};

    let mut registry = NodeRegistry::new();
    flux_nodes_builtin::register_all(&mut registry);

    let object_store: Arc<dyn flux_object_store::ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let engine = Arc::new(Engine::new(
        EngineConfig::from_env()?,
        Arc::new(registry),
        Arc::new(InMemoryWorkflowRepo::new()) as Arc<dyn WorkflowRepo>,
        Arc::new(InMemoryExecutionRepo::new()),
        Arc::clone(&object_store),
        Arc::new(UsageLedger::new()),
        HashMap::new(),
    ));

    info!("listening on {bind}");
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, router(AppState { engine, object_store })).await?;
    Ok(())
}
