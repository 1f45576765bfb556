//! Tool backend boundary.
//!
//! A backend executes named operations and describes them with JSON Schemas.
//! The agent consumes this boundary in exactly two ways: `list_operations`
//! once per instance to build the catalog, and `execute` for each invocation
//! the model requests.

pub mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

pub use local::LocalFsBackend;

/// One operation as described by a backend (MCP `tools/list` shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// JSON Schema describing the operation's arguments object.
    #[serde(default, rename = "inputSchema")]
    pub input_schema: Option<Value>,
}

/// Executes named operations against some substrate (local filesystem here;
/// a remote MCP server behind a transport in other deployments).
///
/// `execute` returns the operation's text result. Logical failures (missing
/// file, bad path) come back as `Ok` with an `Error: ...` string: they are
/// domain data for the model, not errors for the caller. An `Err` from this
/// trait means the backend itself could not be driven.
#[async_trait]
pub trait ToolBackend: Send + Sync {
    async fn list_operations(&self) -> Result<Vec<OperationSpec>>;

    async fn execute(&self, name: &str, arguments: &Value) -> Result<String>;
}
