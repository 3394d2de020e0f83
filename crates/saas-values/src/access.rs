//! Lenient accessors over JSON objects.
//!
//! Every accessor is total: a missing key or a value of the wrong shape
//! yields an empty default instead of an error. Callers that need a shape
//! mismatch to be fatal check the value themselves.

use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Shared empty object returned by [`get_map`] on a miss.
static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();

fn empty_map() -> &'static Map<String, Value> {
    EMPTY.get_or_init(Map::new)
}

/// String value of `key`, or `""` when missing or not a string.
pub fn get_str<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Object value of `key`, or an empty object when missing or not an object.
pub fn get_map<'a>(map: &'a Map<String, Value>, key: &str) -> &'a Map<String, Value> {
    map.get(key).and_then(Value::as_object).unwrap_or_else(|| empty_map())
}

/// List value of `key`.
///
/// A missing key or `null` yields an empty list. A non-list value is
/// wrapped into a single-element list.
pub fn get_list(map: &Map<String, Value>, key: &str) -> Vec<Value> {
    match map.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

/// Boolean value of `key`, or `false` when missing or not a bool.
pub fn get_bool(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// True if any value of the object is the boolean `true`.
pub fn any_true(map: &Map<String, Value>) -> bool {
    map.values().any(|v| v.as_bool() == Some(true))
}

/// Short name of a value's JSON shape, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
