//! Local filesystem backend: the five reference file operations.
//!
//! Result and error strings are part of the contract: they are what the
//! model sees and reasons about, so they stay stable and descriptive
//! (`Error reading file: ...`, `Successfully wrote to ...`).

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::fs;
use tracing::debug;

use super::{OperationSpec, ToolBackend};
use crate::Result;

/// Backend executing operations directly against the local filesystem.
#[derive(Debug, Default, Clone)]
pub struct LocalFsBackend;

impl LocalFsBackend {
    pub fn new() -> Self {
        Self
    }

    fn string_arg<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
        arguments.get(key).and_then(Value::as_str)
    }

    async fn read_file(path: &str) -> String {
        match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => format!("Error reading file: {e}"),
        }
    }

    async fn write_file(path: &str, content: &str) -> String {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent).await {
                    return format!("Error writing file: {e}");
                }
            }
        }
        match fs::write(path, content).await {
            Ok(()) => format!("Successfully wrote to {path}"),
            Err(e) => format!("Error writing file: {e}"),
        }
    }

    async fn list_directory(path: &str) -> String {
        let meta = match fs::metadata(path).await {
            Ok(meta) => meta,
            Err(_) => return format!("Directory does not exist: {path}"),
        };
        if !meta.is_dir() {
            return format!("Path is not a directory: {path}");
        }

        let mut entries = match fs::read_dir(path).await {
            Ok(rd) => rd,
            Err(e) => return format!("Error listing directory: {e}"),
        };

        let mut items = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let kind = match entry.file_type().await {
                        Ok(ft) if ft.is_dir() => "directory",
                        _ => "file",
                    };
                    items.push(format!("{} ({kind})", entry.file_name().to_string_lossy()));
                }
                Ok(None) => break,
                Err(e) => return format!("Error listing directory: {e}"),
            }
        }

        if items.is_empty() {
            return "Directory is empty".to_string();
        }
        // Directory read order is platform-dependent; sort for stable output.
        items.sort();
        items.join("\n")
    }

    async fn create_directory(path: &str) -> String {
        match fs::create_dir_all(path).await {
            Ok(()) => format!("Successfully created directory: {path}"),
            Err(e) => format!("Error creating directory: {e}"),
        }
    }

    async fn delete_file(path: &str) -> String {
        let meta = match fs::metadata(path).await {
            Ok(meta) => meta,
            Err(_) => return format!("File does not exist: {path}"),
        };
        if meta.is_dir() {
            return format!("Path is a directory, not a file: {path}");
        }
        match fs::remove_file(path).await {
            Ok(()) => format!("Successfully deleted file: {path}"),
            Err(e) => format!("Error deleting file: {e}"),
        }
    }
}

#[async_trait]
impl ToolBackend for LocalFsBackend {
    async fn list_operations(&self) -> Result<Vec<OperationSpec>> {
        Ok(vec![
            OperationSpec {
                name: "read_file".into(),
                description: Some("Read the contents of a file".into()),
                input_schema: Some(json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "The path to the file to read"
                        }
                    },
                    "required": ["path"]
                })),
            },
            OperationSpec {
                name: "write_file".into(),
                description: Some("Write content to a file".into()),
                input_schema: Some(json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "The path to the file to write"
                        },
                        "content": {
                            "type": "string",
                            "description": "The content to write to the file"
                        }
                    },
                    "required": ["path", "content"]
                })),
            },
            OperationSpec {
                name: "list_directory".into(),
                description: Some("List the contents of a directory".into()),
                input_schema: Some(json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "The path to the directory to list"
                        }
                    },
                    "required": ["path"]
                })),
            },
            OperationSpec {
                name: "create_directory".into(),
                description: Some("Create a new directory".into()),
                input_schema: Some(json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "The path of the directory to create"
                        }
                    },
                    "required": ["path"]
                })),
            },
            OperationSpec {
                name: "delete_file".into(),
                description: Some("Delete a file".into()),
                input_schema: Some(json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "The path to the file to delete"
                        }
                    },
                    "required": ["path"]
                })),
            },
        ])
    }

    async fn execute(&self, name: &str, arguments: &Value) -> Result<String> {
        debug!(operation = name, "executing file operation");

        let Some(path) = Self::string_arg(arguments, "path") else {
            return Ok(format!("Error: missing required argument 'path' for {name}"));
        };

        let result = match name {
            "read_file" => Self::read_file(path).await,
            "write_file" => {
                let Some(content) = Self::string_arg(arguments, "content") else {
                    return Ok(format!(
                        "Error: missing required argument 'content' for {name}"
                    ));
                };
                Self::write_file(path, content).await
            }
            "list_directory" => Self::list_directory(path).await,
            "create_directory" => Self::create_directory(path).await,
            "delete_file" => Self::delete_file(path).await,
            _ => format!("Unknown tool: {name}"),
        };

        Ok(result)
    }
}
