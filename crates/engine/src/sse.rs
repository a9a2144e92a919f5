//! A minimal `axum` SSE handler matching the wire format of `spec.md` §6.1
//! and the object endpoints of §6.2. Not internet-facing on its own — no
//! auth, no rate limiting, no request body size limits — those belong to
//! the collaborator gateway layer this crate deliberately does not
//! implement.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{http, Json, Router};
use flux_core::{NodeId, ObjectId, OrganizationId, WorkflowId};
use flux_node::ExecutionMode;
use flux_object_store::ObjectStore;
use flux_parameter::ParameterValue;
use futures_core::Stream;
use serde::Deserialize;
use tokio_stream::StreamExt as _;

use crate::engine::{Engine, SubmittedParameters};
use crate::error::EngineError;

/// Shared state behind every route: the engine plus the object store it was
/// built with (exposed separately here since `Engine` does not itself serve
/// raw bytes).
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub object_store: Arc<dyn ObjectStore>,
}

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/workflows/{id}/execute", post(execute_workflow))
        .route("/objects", get(get_object).post(upload_object))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ExecuteRequest {
    #[serde(default)]
    parameters: HashMap<NodeId, HashMap<String, serde_json::Value>>,
    #[serde(default)]
    organization_id: Option<OrganizationId>,
}

async fn execute_workflow(
    State(state): State<AppState>,
    Path(workflow_id): Path<WorkflowId>,
    body: Option<Json<ExecuteRequest>>,
) -> Response {
    let ExecuteRequest { parameters, organization_id } = body.map(|Json(b)| b).unwrap_or_default();
    let organization_id = organization_id.unwrap_or_else(OrganizationId::nil);

    let mut submitted: SubmittedParameters = HashMap::new();
    for (node_id, by_name) in parameters {
        let mut values = HashMap::with_capacity(by_name.len());
        for (name, json) in by_name {
            values.insert(name, ParameterValue::Any(json));
        }
        submitted.insert(node_id, values);
    }

    match state.engine.submit(workflow_id, organization_id, ExecutionMode::Production, submitted).await {
        Ok((_execution_id, stream)) => {
            let sse_stream = stream.map(|sequenced| {
                let payload = serde_json::to_string(&sequenced.event).unwrap_or_else(|_| "{}".to_string());
                Ok::<_, Infallible>(
                    SseEvent::default()
                        .event(sequenced.event.event_type())
                        .id(sequenced.seq.to_string())
                        .data(payload),
                )
            });
            Sse::new(sse_stream).keep_alive(KeepAlive::default()).into_response()
        }
        Err(err) => engine_error_response(&err),
    }
}

fn engine_error_response(err: &EngineError) -> Response {
    let status = match err {
        EngineError::WorkflowNotFound(_) => http::StatusCode::NOT_FOUND,
        EngineError::BudgetGated => http::StatusCode::FORBIDDEN,
        EngineError::Validation(_) | EngineError::Persistence(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string()).into_response()
}

#[derive(Debug, Deserialize)]
struct GetObjectQuery {
    id: ObjectId,
    #[serde(rename = "organizationId")]
    organization_id: OrganizationId,
}

async fn get_object(State(state): State<AppState>, Query(query): Query<GetObjectQuery>) -> Response {
    match state.object_store.get(query.organization_id, query.id).await {
        Ok(Some((bytes, mime_type))) => {
            ([(http::header::CONTENT_TYPE, mime_type)], bytes).into_response()
        }
        Ok(None) => http::StatusCode::NOT_FOUND.into_response(),
        Err(err) => (http::StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

#[derive(serde::Serialize)]
struct UploadResponse {
    reference: flux_object_store::ObjectRef,
}

async fn upload_object(
    State(state): State<AppState>,
    Query(query): Query<UploadOrgQuery>,
    mut multipart: Multipart,
) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let mime_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let Ok(bytes) = field.bytes().await else {
            return http::StatusCode::BAD_REQUEST.into_response();
        };
        return match state.object_store.put(query.organization_id, bytes.to_vec(), mime_type.clone(), None).await {
            Ok(id) => {
                Json(UploadResponse { reference: flux_object_store::ObjectRef::new(id, mime_type) })
                    .into_response()
            }
            Err(err) => (http::StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
        };
    }
    http::StatusCode::BAD_REQUEST.into_response()
}

#[derive(Debug, Deserialize)]
struct UploadOrgQuery {
    #[serde(rename = "organizationId")]
    organization_id: OrganizationId,
}
