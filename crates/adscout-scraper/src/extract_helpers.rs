//! Lenient readers over `serde_json::Value`.
//!
//! The display API is loosely typed: ids arrive as strings on one page and
//! numbers on the next, prices occasionally as numeric strings. Every reader
//! here falls back to an empty/zero value instead of failing.

use serde_json::Value;

/// Reads `obj[key]` as text. Numbers and booleans are stringified; `null`,
/// arrays, objects, and missing keys yield `""`.
pub(crate) fn text(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Reads `obj[key]` as a number. Numeric strings are parsed; anything else
/// yields `0.0`.
pub(crate) fn number(obj: &Value, key: &str) -> f64 {
    obj.get(key).map_or(0.0, as_number)
}

/// Reads `obj[outer][inner]` as a number, e.g. `price.value`.
pub(crate) fn nested_number(obj: &Value, outer: &str, inner: &str) -> f64 {
    obj.get(outer).map_or(0.0, |nested| number(nested, inner))
}

/// Reads `obj[key]` as a list of strings, skipping non-string entries.
pub(crate) fn string_list(obj: &Value, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn as_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
