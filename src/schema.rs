//! Tool parameter validation.
//!
//! Every tool publishes a JSON Schema for its parameters. Before a tool
//! runs, the transports check incoming arguments against that schema so
//! tools only ever see well-typed input.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Serializable tool info for the `/tools/list` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    /// Whether this tool ships with the server (`true`) or was registered
    /// by an embedding application (`false`).
    pub builtin: bool,
    /// JSON Schema of the parameters object.
    pub parameters: Value,
}

/// Validate incoming JSON parameters against a tool's schema.
///
/// Checks required fields, type compatibility, enum constraints, and
/// integer minimums. Injects default values for missing optional fields.
/// Returns the validated (and potentially enriched) parameters.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let params_obj = match params {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => bail!("parameters must be an object, got {}", json_type_name(other)),
    };

    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .cloned()
        .unwrap_or_default();

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    for field in &required {
        if !params_obj.contains_key(*field) {
            bail!("missing required parameter: {}", field);
        }
    }

    let mut result = params_obj.clone();

    for (name, prop) in &properties {
        let Some(value) = params_obj.get(name) else {
            if let Some(default) = prop.get("default") {
                result.insert(name.clone(), default.clone());
            }
            continue;
        };

        if let Some(expected) = prop.get("type").and_then(|t| t.as_str()) {
            let type_ok = match expected {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            // Optional fields may be sent as explicit null.
            let null_ok = value.is_null() && !required.contains(&name.as_str());
            if !type_ok && !null_ok {
                bail!(
                    "parameter '{}' must be of type '{}', got {}",
                    name,
                    expected,
                    json_type_name(value)
                );
            }
        }

        if let Some(allowed) = prop.get("enum").and_then(|e| e.as_array()) {
            if !allowed.contains(value) {
                let names: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                bail!(
                    "parameter '{}' must be one of [{}], got {}",
                    name,
                    names.join(", "),
                    value
                );
            }
        }

        if let (Some(min), Some(n)) = (prop.get("minimum").and_then(|m| m.as_i64()), value.as_i64()) {
            if n < min {
                bail!("parameter '{}' must be >= {}, got {}", name, min, n);
            }
        }
    }

    Ok(Value::Object(result))
}

/// Return a human-readable name for a JSON value's type.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
