//! Core type definitions: conversation messages, tool descriptors, audit records.

pub mod message;
pub mod tool;

pub use message::{ChatRole, ConversationMessage};
pub use tool::{FunctionDefinition, ToolCallRecord, ToolCallRequest, ToolDefinition};
