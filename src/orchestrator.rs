//! Function-calling orchestrator.
//!
//! Drives the conversation loop: send the full conversation plus the catalog
//! to the model, execute whatever tool calls come back (sequentially, in the
//! model's order), append the results, repeat. The loop ends when the model
//! answers without tool calls or when the round-trip bound is hit.
//!
//! Two failure channels with opposite policies meet here: tool-level failures
//! are appended as ordinary tool-result content and the loop continues, while
//! model-channel failures terminate the run immediately with the partial
//! conversation and audit trail attached.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::ToolBackend;
use crate::catalog::build_catalog;
use crate::chat::ChatModel;
use crate::executor::InvocationExecutor;
use crate::types::{ConversationMessage, ToolCallRecord, ToolDefinition};
use crate::{Error, Result};

/// Round-trip bound applied when the caller does not specify one.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// How a run reached its final reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The model produced a reply with no further tool calls.
    Completed,
    /// The round-trip bound was hit while the model was still requesting
    /// tools. A defined terminal outcome, not an error.
    IterationBoundReached,
}

/// Everything a caller gets back from one run: the reply, the audit trail,
/// and the full conversation (which can be fed into a follow-up run to
/// continue the session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    pub final_reply: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub conversation: Vec<ConversationMessage>,
    pub status: RunStatus,
}

/// Owns one catalog snapshot and runs conversations against it.
///
/// Runs are independent: each holds its own conversation and audit trail, so
/// one orchestrator can serve concurrent runs. The catalog is immutable after
/// construction; rebuilding it means constructing a new orchestrator.
pub struct Orchestrator {
    model: Arc<dyn ChatModel>,
    executor: InvocationExecutor,
    catalog: Vec<ToolDefinition>,
}

impl Orchestrator {
    /// Build the catalog from the backend (once) and wire up the executor.
    pub async fn new(model: Arc<dyn ChatModel>, backend: Arc<dyn ToolBackend>) -> Result<Self> {
        let catalog = build_catalog(backend.as_ref()).await?;
        let executor = InvocationExecutor::new(backend, &catalog)?;
        Ok(Self {
            model,
            executor,
            catalog,
        })
    }

    pub fn catalog(&self) -> &[ToolDefinition] {
        &self.catalog
    }

    /// Execute one invocation directly, bypassing the model. Used by the
    /// direct file-operation endpoint; follows the same error-string
    /// convention as calls made from inside a run.
    pub async fn invoke_tool(&self, name: &str, arguments: &serde_json::Value) -> String {
        self.executor.invoke(name, arguments).await
    }

    /// Run the conversation loop.
    ///
    /// `max_iterations` bounds model round-trips, not individual tool calls;
    /// the bound is checked before each new model call, so at most
    /// `max_iterations` round-trips are ever issued. Values below 1 are
    /// treated as 1. Cancellation is dropping the returned future: no further
    /// round-trips or invocations are started, and an invocation already in
    /// flight is left to the backend (file operations are not interrupted
    /// mid-write).
    pub async fn run(
        &self,
        conversation: Vec<ConversationMessage>,
        model: &str,
        max_iterations: u32,
    ) -> Result<OrchestrationResult> {
        let max_iterations = max_iterations.max(1);
        let mut conversation = conversation;
        let mut records: Vec<ToolCallRecord> = Vec::new();
        let mut ordinal: u32 = 0;
        let mut round_trips: u32 = 0;

        info!(model, max_iterations, messages = conversation.len(), "starting run");

        loop {
            let turn = match self
                .model
                .complete(model, &conversation, &self.catalog)
                .await
            {
                Ok(turn) => turn,
                Err(e) => {
                    // Fatal: the model channel cannot be repaired from here.
                    // Hand the partial state back instead of losing it.
                    return Err(Error::ModelCallFailed {
                        reason: e.to_string(),
                        conversation,
                        tool_calls: records,
                    });
                }
            };
            round_trips += 1;

            let requested = turn.tool_calls.clone();
            conversation.push(ConversationMessage::assistant_turn(
                turn.content.clone(),
                turn.tool_calls,
            ));

            if requested.is_empty() {
                let final_reply = turn.content.unwrap_or_default();
                info!(round_trips, tool_calls = records.len(), "run completed");
                return Ok(OrchestrationResult {
                    final_reply,
                    tool_calls: records,
                    conversation,
                    status: RunStatus::Completed,
                });
            }

            debug!(round_trips, requested = requested.len(), "executing tool calls");

            // Same-turn calls run one after another, in the model's order.
            // Later calls may depend on earlier ones having completed, and
            // the backend gives no isolation guarantees across concurrent
            // file operations.
            for call in &requested {
                let result = self.executor.invoke(&call.name, &call.arguments).await;
                debug!(operation = %call.name, id = %call.id, "tool call executed");
                conversation.push(ConversationMessage::tool_result(&call.id, &result));
                ordinal += 1;
                records.push(ToolCallRecord {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                    result,
                    ordinal,
                });
            }

            // Enforce the bound before issuing another model call, so the
            // round-trip count can never exceed it.
            if round_trips >= max_iterations {
                let final_reply = turn.content.unwrap_or_else(|| {
                    format!(
                        "Stopped after reaching the limit of {max_iterations} model round-trips \
                         while tool calls were still being requested."
                    )
                });
                info!(round_trips, tool_calls = records.len(), "iteration bound reached");
                return Ok(OrchestrationResult {
                    final_reply,
                    tool_calls: records,
                    conversation,
                    status: RunStatus::IterationBoundReached,
                });
            }
        }
    }
}
