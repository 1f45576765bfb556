//! # mcp-file-agent
//!
//! A function-calling agent that exposes file-system tools to chat models.
//! The core is the orchestration engine: it drives a multi-turn conversation
//! with a chat model, translates the model's tool requests into invocations
//! against a tool backend, feeds results back into the conversation, and
//! stops when the model answers without tools or a round-trip bound is hit.
//!
//! ## Architecture
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`backend`] | Tool backend boundary and the local filesystem backend |
//! | [`catalog`] | Backend operations → model-facing function definitions |
//! | [`executor`] | Invocation execution with schema-validated arguments |
//! | [`chat`] | Chat model boundary and the OpenAI-compatible client |
//! | [`orchestrator`] | The conversation state machine |
//! | [`server`] | axum HTTP surface |
//! | [`types`] | Messages, tool descriptors, audit records |
//!
//! ## Error policy
//!
//! Model-channel failures are fatal to a run and surface as
//! [`Error::ModelCallFailed`] with the partial conversation attached.
//! Tool failures are data: they travel back to the model as `Error: ...`
//! result strings and the loop continues.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mcp_file_agent::backend::LocalFsBackend;
//! use mcp_file_agent::chat::OpenAiChatModel;
//! use mcp_file_agent::orchestrator::{Orchestrator, DEFAULT_MAX_ITERATIONS};
//! use mcp_file_agent::types::ConversationMessage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model = OpenAiChatModel::new(
//!         "https://api.openai.com/v1",
//!         std::env::var("OPENAI_API_KEY").ok(),
//!     )?;
//!     let orchestrator =
//!         Orchestrator::new(Arc::new(model), Arc::new(LocalFsBackend::new())).await?;
//!
//!     let conversation = vec![ConversationMessage::user(
//!         "Create /tmp/hello.txt containing 'hi', then read it back.",
//!     )];
//!     let result = orchestrator
//!         .run(conversation, "gpt-4", DEFAULT_MAX_ITERATIONS)
//!         .await?;
//!     println!("{}", result.final_reply);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod server;
pub mod types;

pub use config::AgentConfig;
pub use error::Error;
pub use orchestrator::{OrchestrationResult, Orchestrator, RunStatus, DEFAULT_MAX_ITERATIONS};
pub use types::{ConversationMessage, ToolCallRecord, ToolCallRequest, ToolDefinition};

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;
