//! OpenAI-compatible Chat Completions client.
//!
//! Speaks the `/chat/completions` wire format: tool calls arrive with their
//! arguments as JSON text inside `function.arguments`, and are decoded into
//! structured values before the orchestrator sees them. Works against any
//! endpoint implementing the same surface (OpenAI, local inference servers).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{AssistantTurn, ChatModel};
use crate::types::{ConversationMessage, ToolCallRequest, ToolDefinition};
use crate::{Error, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for an OpenAI-compatible chat endpoint.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiChatModel {
    /// Create a client for `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn build_body(
        model: &str,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Value {
        let mut body = json!({
            "model": model,
            "messages": messages.iter().map(wire_message).collect::<Vec<_>>(),
        });
        if !tools.is_empty() {
            body["tools"] = json!(tools);
            body["tool_choice"] = json!("auto");
        }
        body
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(
        &self,
        model: &str,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model, messages = messages.len(), "sending chat completion request");

        let mut request = self
            .client
            .post(&url)
            .json(&Self::build_body(model, messages, tools));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Remote {
                status: status.as_u16(),
                message: "response contained no choices".to_string(),
            })?;

        let mut tool_calls = Vec::new();
        for call in choice.message.tool_calls.unwrap_or_default() {
            // Arguments come over the wire as JSON text; a model emitting
            // undecodable text is a malformed response, which is fatal.
            let arguments: Value = serde_json::from_str(&call.function.arguments)?;
            tool_calls.push(ToolCallRequest {
                id: call.id,
                name: call.function.name,
                arguments,
            });
        }

        Ok(AssistantTurn {
            content: choice.message.content,
            tool_calls,
        })
    }
}

/// Convert a conversation message to its wire form. Tool calls are nested
/// under `function` with re-encoded JSON-text arguments, matching what the
/// model originally produced.
fn wire_message(msg: &ConversationMessage) -> Value {
    let mut out = json!({
        "role": msg.role,
        "content": msg.content,
    });
    if let Some(calls) = &msg.tool_calls {
        out["tool_calls"] = Value::Array(
            calls
                .iter()
                .map(|c| {
                    json!({
                        "id": c.id,
                        "type": "function",
                        "function": {
                            "name": c.name,
                            "arguments": c.arguments.to_string(),
                        }
                    })
                })
                .collect(),
        );
    }
    if let Some(id) = &msg.tool_call_id {
        out["tool_call_id"] = json!(id);
    }
    out
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunctionCall,
}

#[derive(Debug, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}
