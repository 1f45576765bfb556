//! Tool calling definitions: catalog entries, model-requested calls, audit records.

use serde::{Deserialize, Serialize};

/// Model-facing tool descriptor (function-calling format).
///
/// The set of these built for one agent instance is the catalog: immutable for
/// the lifetime of the instance and shared read-only across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String, // "function"
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    pub fn function(function: FunctionDefinition) -> Self {
        Self {
            tool_type: "function".to_string(),
            function,
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the arguments object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// A tool invocation requested by the model.
///
/// The `id` is assigned by the model and must be echoed back unchanged on the
/// matching tool-result message so the model can correlate results to requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Audit-trail entry for one executed tool call.
///
/// Kept independently of the conversation and returned to the caller for
/// observability. Ordinals start at 1 and increase strictly across the whole
/// run; they are never reset per turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    pub arguments: serde_json::Value,
    pub result: String,
    pub ordinal: u32,
}
