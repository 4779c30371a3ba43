//! Shared helpers for resolving field paths against JSON payloads.
//!
//! Used by the normalizer to locate nested record arrays and by the presenter
//! and filters to turn leaf values into text.

use apifetch_types::value_at_path;
use serde_json::Value;

/// Returns the array found at `path`, or `None` when the path is missing or
/// resolves to something else. `""` and `"."` address the payload root.
pub fn array_at_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    value_at_path(payload, path)?.as_array()
}

/// Returns true when the JSON value is scalar (string/number/bool/null).
pub fn is_scalar_json_value(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null)
}

/// Short JSON type name for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text for a scalar leaf. Strings are returned without quotes; `null`,
/// arrays and objects have no text form and yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
