//! Chat model boundary.
//!
//! The orchestrator talks to the model through the [`ChatModel`] trait: one
//! request carrying the full conversation plus the catalog, one response
//! carrying either plain text or tool-call requests. Production use goes
//! through [`OpenAiChatModel`]; tests drive the loop with scripted
//! implementations.

pub mod openai;

use async_trait::async_trait;

use crate::types::{ConversationMessage, ToolCallRequest, ToolDefinition};
use crate::Result;

pub use openai::OpenAiChatModel;

/// One assistant response: plain content, tool-call requests, or both.
///
/// Content alongside tool calls is preserved in the conversation but is not
/// the final answer while calls are pending.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantTurn {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl AssistantTurn {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(content: Option<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content,
            tool_calls,
        }
    }

    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A chat model capable of function calling, treated as an opaque remote
/// service. Errors from this boundary are infrastructure failures and are
/// fatal to the run that hit them.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn>;
}
