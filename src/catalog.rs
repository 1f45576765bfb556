//! Tool catalog adapter.
//!
//! Queries the backend for its operations and converts each into the
//! function-definition shape a chat model expects. The conversion is lossless
//! for `type`, `required` and `description` (including per-property
//! descriptions); any other schema field is dropped rather than rejected, so
//! backends can grow their schemas without breaking older agents.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::backend::{OperationSpec, ToolBackend};
use crate::types::{FunctionDefinition, ToolDefinition};
use crate::{Error, Result};

/// Schema fields carried through to the model. Everything else is dropped.
const KEPT_FIELDS: &[&str] = &["type", "description", "required", "enum"];

/// Build the catalog for one agent instance.
///
/// Called once per instance; the resulting set is immutable and reused across
/// runs. Fails with [`Error::BackendUnavailable`] when the backend cannot be
/// listed or an operation carries a schema that is not an object.
pub async fn build_catalog(backend: &dyn ToolBackend) -> Result<Vec<ToolDefinition>> {
    let specs = backend.list_operations().await.map_err(|e| match e {
        Error::BackendUnavailable(_) => e,
        other => Error::BackendUnavailable(other.to_string()),
    })?;

    let mut catalog = Vec::with_capacity(specs.len());
    for spec in &specs {
        catalog.push(convert_operation(spec)?);
    }

    debug!(tools = catalog.len(), "catalog built");
    Ok(catalog)
}

fn convert_operation(spec: &OperationSpec) -> Result<ToolDefinition> {
    let parameters = match &spec.input_schema {
        Some(schema) => Some(sanitize_schema(&spec.name, schema)?),
        None => None,
    };

    Ok(ToolDefinition::function(FunctionDefinition {
        name: spec.name.clone(),
        description: spec.description.clone(),
        parameters,
    }))
}

/// Reduce a backend schema to the fields the model needs.
///
/// Keeps `type`, `description`, `required` and `enum` at every level, recurses
/// into `properties` and `items`, and drops everything else.
fn sanitize_schema(operation: &str, schema: &Value) -> Result<Value> {
    let Value::Object(obj) = schema else {
        return Err(Error::BackendUnavailable(format!(
            "operation '{operation}' has a malformed schema: expected object, got {schema}"
        )));
    };

    let mut out = Map::new();
    for field in KEPT_FIELDS {
        if let Some(v) = obj.get(*field) {
            out.insert((*field).to_string(), v.clone());
        }
    }

    if let Some(props) = obj.get("properties") {
        let Value::Object(props) = props else {
            return Err(Error::BackendUnavailable(format!(
                "operation '{operation}' has malformed properties: {props}"
            )));
        };
        let mut kept = Map::new();
        for (name, prop) in props {
            kept.insert(name.clone(), sanitize_schema(operation, prop)?);
        }
        out.insert("properties".to_string(), Value::Object(kept));
    }

    if let Some(items) = obj.get("items") {
        out.insert("items".to_string(), sanitize_schema(operation, items)?);
    }

    for dropped in obj.keys().filter(|k| {
        !KEPT_FIELDS.contains(&k.as_str()) && *k != "properties" && *k != "items"
    }) {
        warn!(operation, field = %dropped, "dropping unrecognized schema field");
    }

    Ok(Value::Object(out))
}
