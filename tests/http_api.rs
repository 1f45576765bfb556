//! Router-level tests for the HTTP surface, driven with `tower::ServiceExt`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use mcp_file_agent::backend::{OperationSpec, ToolBackend};
use mcp_file_agent::chat::{AssistantTurn, ChatModel};
use mcp_file_agent::orchestrator::Orchestrator;
use mcp_file_agent::server::{router, AppState};
use mcp_file_agent::types::{ConversationMessage, ToolCallRequest, ToolDefinition};
use mcp_file_agent::{Error, Result};

struct ScriptedModel {
    turns: Mutex<VecDeque<AssistantTurn>>,
}

impl ScriptedModel {
    fn new(turns: Vec<AssistantTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        _model: &str,
        _messages: &[ConversationMessage],
        _tools: &[ToolDefinition],
    ) -> Result<AssistantTurn> {
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(Error::Remote {
                status: 500,
                message: "script exhausted".to_string(),
            })
    }
}

struct FixedBackend;

#[async_trait]
impl ToolBackend for FixedBackend {
    async fn list_operations(&self) -> Result<Vec<OperationSpec>> {
        let path_only = json!({
            "type": "object",
            "properties": { "path": { "type": "string" } },
            "required": ["path"]
        });
        Ok(vec![
            OperationSpec {
                name: "read_file".into(),
                description: Some("Read the contents of a file".into()),
                input_schema: Some(path_only.clone()),
            },
            OperationSpec {
                name: "write_file".into(),
                description: Some("Write content to a file".into()),
                input_schema: Some(json!({
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "content": { "type": "string" }
                    },
                    "required": ["path", "content"]
                })),
            },
            OperationSpec {
                name: "list_directory".into(),
                description: Some("List the contents of a directory".into()),
                input_schema: Some(path_only.clone()),
            },
            OperationSpec {
                name: "create_directory".into(),
                description: Some("Create a new directory".into()),
                input_schema: Some(path_only.clone()),
            },
            OperationSpec {
                name: "delete_file".into(),
                description: Some("Delete a file".into()),
                input_schema: Some(path_only),
            },
        ])
    }

    async fn execute(&self, name: &str, arguments: &Value) -> Result<String> {
        Ok(match name {
            "read_file" if arguments["path"] == "/denied" => {
                "Error reading file: permission denied".to_string()
            }
            "read_file" => "contents".to_string(),
            "write_file" => "OK".to_string(),
            "list_directory" => "a.txt (file)".to_string(),
            "create_directory" => "Successfully created directory: /tmp/new".to_string(),
            "delete_file" => "Successfully deleted file: /tmp/old".to_string(),
            other => format!("Unknown tool: {other}"),
        })
    }
}

async fn app(turns: Vec<AssistantTurn>) -> axum::Router {
    let orchestrator = Orchestrator::new(
        Arc::new(ScriptedModel::new(turns)),
        Arc::new(FixedBackend),
    )
    .await
    .unwrap();
    router(Arc::new(AppState::new(orchestrator, "gpt-4", 5)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_tool_count() {
    let app = app(vec![]).await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["tools"], 5);
}

#[tokio::test]
async fn tools_endpoint_lists_the_catalog() {
    let app = app(vec![]).await;
    let response = app
        .oneshot(Request::builder().uri("/tools").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    let names: Vec<&str> = json["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["function"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "read_file",
            "write_file",
            "list_directory",
            "create_directory",
            "delete_file"
        ]
    );
}

#[tokio::test]
async fn chat_runs_the_loop_and_returns_the_audit_trail() {
    let app = app(vec![
        AssistantTurn::with_tool_calls(
            None,
            vec![ToolCallRequest {
                id: "call_1".into(),
                name: "write_file".into(),
                arguments: json!({"path": "/tmp/t.txt", "content": "hi"}),
            }],
        ),
        AssistantTurn::text("Done"),
    ])
    .await;

    let response = app
        .oneshot(post_json(
            "/v1/chat",
            json!({"messages": [{"role": "user", "content": "write it"}]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["response"], "Done");
    assert_eq!(json["status"], "completed");
    assert_eq!(json["function_calls"][0]["name"], "write_file");
    assert_eq!(json["function_calls"][0]["result"], "OK");
    assert_eq!(json["conversation"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn chat_honors_max_function_calls() {
    // Model keeps requesting tools; bound of 1 stops it after one round.
    let app = app(vec![
        AssistantTurn::with_tool_calls(
            None,
            vec![ToolCallRequest {
                id: "call_1".into(),
                name: "read_file".into(),
                arguments: json!({"path": "/a"}),
            }],
        ),
        AssistantTurn::with_tool_calls(
            None,
            vec![ToolCallRequest {
                id: "call_2".into(),
                name: "read_file".into(),
                arguments: json!({"path": "/b"}),
            }],
        ),
    ])
    .await;

    let response = app
        .oneshot(post_json(
            "/v1/chat",
            json!({
                "messages": [{"role": "user", "content": "loop"}],
                "max_function_calls": 1
            }),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["status"], "iteration_bound_reached");
    assert_eq!(json["function_calls"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn chat_model_failure_maps_to_502_with_partial_state() {
    let app = app(vec![AssistantTurn::with_tool_calls(
        None,
        vec![ToolCallRequest {
            id: "call_1".into(),
            name: "read_file".into(),
            arguments: json!({"path": "/a"}),
        }],
    )])
    .await;

    let response = app
        .oneshot(post_json(
            "/v1/chat",
            json!({"messages": [{"role": "user", "content": "go"}]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["error"], "model_call_failed");
    // The partial conversation and audit trail survive the failure.
    assert_eq!(json["conversation"].as_array().unwrap().len(), 3);
    assert_eq!(json["function_calls"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn file_operation_success_and_logical_failure() {
    let app = app(vec![]).await;

    let response = app
        .oneshot(post_json(
            "/v1/file-operation",
            json!({"operation": "write_file", "path": "/tmp/t.txt", "content": "hi"}),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["result"], "OK");
    assert!(json.get("error").is_none());

    let app = self::app(vec![]).await;
    let response = app
        .oneshot(post_json(
            "/v1/file-operation",
            json!({"operation": "shred_disk", "path": "/"}),
        ))
        .await
        .unwrap();
    // Structurally fine, logically an error: status stays 200.
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Error: unknown operation: shred_disk");
}

#[tokio::test]
async fn per_operation_endpoints_delegate_to_the_backend() {
    let cases = [
        ("/read-file", json!({"path": "/tmp/a.txt"}), "contents"),
        (
            "/write-file",
            json!({"path": "/tmp/t.txt", "content": "hi"}),
            "OK",
        ),
        ("/list-directory", json!({"path": "/tmp"}), "a.txt (file)"),
        (
            "/create-directory",
            json!({"path": "/tmp/new"}),
            "Successfully created directory: /tmp/new",
        ),
        (
            "/delete-file",
            json!({"path": "/tmp/old"}),
            "Successfully deleted file: /tmp/old",
        ),
    ];

    for (uri, body, expected) in cases {
        let app = app(vec![]).await;
        let response = app.oneshot(post_json(uri, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true, "{uri}");
        assert_eq!(json["result"], expected, "{uri}");
    }
}

#[tokio::test]
async fn per_operation_endpoint_reports_logical_failure() {
    let app = app(vec![]).await;
    let response = app
        .oneshot(post_json("/read-file", json!({"path": "/denied"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Error reading file: permission denied");
    assert_eq!(json["result"], "");
}

#[tokio::test]
async fn root_lists_endpoints() {
    let app = app(vec![]).await;
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["endpoints"]["chat"], "/v1/chat");
}
