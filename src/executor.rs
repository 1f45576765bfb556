//! Invocation executor.
//!
//! Single substitution point between the orchestration loop and the tool
//! backend. Invocations always "succeed" structurally: unknown operations,
//! argument mismatches and backend failures all come back as `Error: ...`
//! strings, never as Rust errors, so the model gets a chance to adapt and
//! the loop stays exception-free across the tool boundary.

use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::ToolBackend;
use crate::types::ToolDefinition;
use crate::{Error, Result};

/// Executes model-requested tool calls against the backend, validating
/// arguments against the catalog's parameter schemas first.
pub struct InvocationExecutor {
    backend: Arc<dyn ToolBackend>,
    validators: HashMap<String, Option<JSONSchema>>,
}

impl InvocationExecutor {
    /// Build an executor bound to one catalog snapshot.
    ///
    /// Compiles each tool's parameter schema up front; a schema that does not
    /// compile is treated the same as a malformed backend listing.
    pub fn new(backend: Arc<dyn ToolBackend>, catalog: &[ToolDefinition]) -> Result<Self> {
        let mut validators = HashMap::with_capacity(catalog.len());
        for tool in catalog {
            let compiled = match &tool.function.parameters {
                Some(schema) => Some(JSONSchema::compile(schema).map_err(|e| {
                    Error::BackendUnavailable(format!(
                        "operation '{}' has an uncompilable schema: {e}",
                        tool.name()
                    ))
                })?),
                None => None,
            };
            validators.insert(tool.name().to_string(), compiled);
        }
        Ok(Self {
            backend,
            validators,
        })
    }

    /// Invoke one operation. Never fails the run; the returned text is either
    /// the backend's result verbatim or an `Error: ...` string.
    pub async fn invoke(&self, name: &str, arguments: &Value) -> String {
        let Some(validator) = self.validators.get(name) else {
            warn!(operation = name, "model requested an operation not in the catalog");
            return format!("Error: unknown operation: {name}");
        };

        if let Some(compiled) = validator {
            if let Err(errors) = compiled.validate(arguments) {
                let details: Vec<String> = errors.map(|e| e.to_string()).collect();
                debug!(operation = name, "argument validation failed");
                return format!(
                    "Error: invalid arguments for {name}: {}",
                    details.join("; ")
                );
            }
        }

        match self.backend.execute(name, arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!(operation = name, error = %e, "backend execution failed");
                format!("Error: {e}")
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OperationSpec;
    use crate::catalog::build_catalog;
    use async_trait::async_trait;
    use serde_json::json;

    /// Backend with one echo operation; `fail` makes execute return Err.
    struct StubBackend {
        fail: bool,
    }

    #[async_trait]
    impl ToolBackend for StubBackend {
        async fn list_operations(&self) -> Result<Vec<OperationSpec>> {
            Ok(vec![OperationSpec {
                name: "echo".into(),
                description: Some("Echo the input back".into()),
                input_schema: Some(json!({
                    "type": "object",
                    "properties": { "text": { "type": "string" } },
                    "required": ["text"]
                })),
            }])
        }

        async fn execute(&self, _name: &str, arguments: &Value) -> Result<String> {
            if self.fail {
                return Err(Error::BackendUnavailable("backend crashed".into()));
            }
            Ok(arguments["text"].as_str().unwrap_or_default().to_string())
        }
    }

    async fn executor(fail: bool) -> InvocationExecutor {
        let backend = Arc::new(StubBackend { fail });
        let catalog = build_catalog(backend.as_ref()).await.unwrap();
        InvocationExecutor::new(backend, &catalog).unwrap()
    }

    #[tokio::test]
    async fn test_known_operation_passes_through() {
        let exec = executor(false).await;
        let result = exec.invoke("echo", &json!({"text": "hi"})).await;
        assert_eq!(result, "hi");
    }

    #[tokio::test]
    async fn test_unknown_operation_is_error_string() {
        let exec = executor(false).await;
        let result = exec.invoke("delete_everything", &json!({})).await;
        assert_eq!(result, "Error: unknown operation: delete_everything");
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_error_string() {
        let exec = executor(false).await;

        let result = exec.invoke("echo", &json!({})).await;
        assert!(result.starts_with("Error: invalid arguments for echo:"));

        let result = exec.invoke("echo", &json!({"text": 42})).await;
        assert!(result.starts_with("Error: invalid arguments for echo:"));
    }

    #[tokio::test]
    async fn test_backend_failure_is_error_string_not_panic() {
        let exec = executor(true).await;
        let result = exec.invoke("echo", &json!({"text": "hi"})).await;
        assert!(result.starts_with("Error:"));
        assert!(result.contains("backend crashed"));
    }
}
