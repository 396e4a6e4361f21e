//! Python source rendering for structured command arguments.

use serde_json::Value;

/// Render a JSON value as the equivalent Python literal.
///
/// Strings use JSON escaping, which Python accepts unchanged.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => Value::String(s.clone()).to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", Value::String(k.clone()), literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// `["key"]` subscript for a string key.
pub fn subscript(key: &str) -> String {
    format!("[{}]", Value::String(key.to_string()))
}
