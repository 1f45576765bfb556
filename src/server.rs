//! HTTP surface for the agent.
//!
//! Exposes the orchestrator to chat-based callers (`POST /v1/chat`) and the
//! tool backend to direct callers (`POST /v1/file-operation`), plus catalog
//! and health introspection. One `AppState` is shared across handlers; runs
//! triggered by concurrent requests are independent.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::orchestrator::{Orchestrator, OrchestrationResult, RunStatus};
use crate::types::{ConversationMessage, ToolCallRecord};
use crate::Error;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared state: the orchestrator (with its immutable catalog) and the
/// per-deployment defaults.
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub default_model: String,
    pub default_max_iterations: u32,
}

impl AppState {
    pub fn new(
        orchestrator: Orchestrator,
        default_model: impl Into<String>,
        default_max_iterations: u32,
    ) -> Self {
        Self {
            orchestrator,
            default_model: default_model.into(),
            default_max_iterations,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/v1/chat", post(chat))
        .route("/v1/file-operation", post(file_operation))
        .route("/read-file", post(read_file))
        .route("/write-file", post(write_file))
        .route("/list-directory", post(list_directory))
        .route("/create-directory", post(create_directory))
        .route("/delete-file", post(delete_file))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
pub struct ChatApiRequest {
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_function_calls: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ChatApiResponse {
    pub response: String,
    pub function_calls: Vec<ToolCallRecord>,
    pub conversation: Vec<ConversationMessage>,
    pub status: RunStatus,
}

impl From<OrchestrationResult> for ChatApiResponse {
    fn from(result: OrchestrationResult) -> Self {
        Self {
            response: result.final_reply,
            function_calls: result.tool_calls,
            conversation: result.conversation,
            status: result.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FileOperationRequest {
    pub operation: String,
    pub path: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct WriteFileRequest {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub success: bool,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "MCP file agent API",
        "version": API_VERSION,
        "endpoints": {
            "chat": "/v1/chat",
            "file_operation": "/v1/file-operation",
            "tools": "/tools",
            "health": "/health"
        }
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "tools": state.orchestrator.catalog().len(),
    }))
}

async fn list_tools(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "tools": state.orchestrator.catalog() }))
}

/// Run the function-calling loop for one request.
///
/// A fatal model-channel failure maps to 502 and carries the partial
/// conversation and audit trail, so the caller never sees a silently
/// truncated run.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatApiRequest>,
) -> Result<Json<ChatApiResponse>, (StatusCode, Json<Value>)> {
    let model = req.model.as_deref().unwrap_or(&state.default_model);
    let max_iterations = req
        .max_function_calls
        .unwrap_or(state.default_max_iterations);

    match state
        .orchestrator
        .run(req.messages, model, max_iterations)
        .await
    {
        Ok(result) => Ok(Json(result.into())),
        Err(Error::ModelCallFailed {
            reason,
            conversation,
            tool_calls,
        }) => {
            error!(reason = %reason, "model call failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "model_call_failed",
                    "detail": reason,
                    "conversation": conversation,
                    "function_calls": tool_calls,
                })),
            ))
        }
        Err(e) => {
            error!(error = %e, "chat request failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal", "detail": e.to_string() })),
            ))
        }
    }
}

/// Execute a single file operation without involving the model.
///
/// An `Error:`-prefixed result is reported as a logical failure; the HTTP
/// status stays 200 because the invocation itself succeeded structurally.
async fn file_operation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FileOperationRequest>,
) -> Json<OperationResponse> {
    let mut arguments = json!({ "path": req.path });
    if let Some(content) = req.content {
        arguments["content"] = json!(content);
    }
    run_operation(&state, &req.operation, arguments).await
}

// Per-operation convenience routes: each one is the generic endpoint with
// the operation name fixed.

async fn read_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PathRequest>,
) -> Json<OperationResponse> {
    run_operation(&state, "read_file", json!({ "path": req.path })).await
}

async fn write_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WriteFileRequest>,
) -> Json<OperationResponse> {
    run_operation(
        &state,
        "write_file",
        json!({ "path": req.path, "content": req.content }),
    )
    .await
}

async fn list_directory(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PathRequest>,
) -> Json<OperationResponse> {
    run_operation(&state, "list_directory", json!({ "path": req.path })).await
}

async fn create_directory(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PathRequest>,
) -> Json<OperationResponse> {
    run_operation(&state, "create_directory", json!({ "path": req.path })).await
}

async fn delete_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PathRequest>,
) -> Json<OperationResponse> {
    run_operation(&state, "delete_file", json!({ "path": req.path })).await
}

async fn run_operation(
    state: &AppState,
    operation: &str,
    arguments: Value,
) -> Json<OperationResponse> {
    let result = state.orchestrator.invoke_tool(operation, &arguments).await;

    if result.starts_with("Error") {
        Json(OperationResponse {
            success: false,
            result: String::new(),
            error: Some(result),
        })
    } else {
        Json(OperationResponse {
            success: true,
            result,
            error: None,
        })
    }
}
