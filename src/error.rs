use thiserror::Error;

use crate::types::{ConversationMessage, ToolCallRecord};

/// Unified error type for the agent.
///
/// Only two conditions are fatal to an orchestration run: the catalog cannot
/// be built (`BackendUnavailable`) or the model channel breaks
/// (`ModelCallFailed`). Tool-level failures never appear here; they are
/// carried as ordinary tool-result content so the model can react to them.
#[derive(Debug, Error)]
pub enum Error {
    /// The tool backend could not be reached or returned a malformed schema.
    /// The run cannot start without a catalog.
    #[error("tool backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The chat model channel failed (transport, auth, malformed response).
    /// Terminal for the run; the conversation and audit trail built so far
    /// are preserved for the caller to inspect.
    #[error("model call failed: {reason}")]
    ModelCallFailed {
        reason: String,
        conversation: Vec<ConversationMessage>,
        tool_calls: Vec<ToolCallRecord>,
    },

    /// Non-2xx status from the model endpoint.
    #[error("model endpoint returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
