//! JSON <-> filter value conversion utilities

use serde_json::Map;

use crate::{FuzzResult, Value, cli::CliError};

/// Attribute names every result carries.
const METRICS: [&str; 5] = ["code", "lines", "words", "chars", "index"];

/// Convert serde_json::Value to a filter Value
pub fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(obj) => {
            Value::Object(obj.into_iter().map(|(k, v)| (k, json_to_value(v))).collect())
        }
    }
}

/// Convert a filter Value to serde_json::Value
pub fn value_to_json(v: Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Object(obj) => {
            serde_json::Value::Object(obj.into_iter().map(|(k, v)| (k, value_to_json(v))).collect())
        }
    }
}

/// Build a result from a JSON object.
///
/// `payloads` (an array) feeds `FUZZ`, `FUZ2Z`, ...; every other key becomes
/// an attribute. A missing `index` defaults to the 1-based `position`.
pub fn json_to_result(position: usize, json: serde_json::Value) -> Result<FuzzResult, CliError> {
    let serde_json::Value::Object(mut obj) = json else {
        return Err(CliError::InvalidResult {
            position,
            reason: "expected a JSON object".to_string(),
        });
    };

    let index = match obj.remove("index") {
        None => position as i64,
        Some(v) => v.as_i64().ok_or_else(|| CliError::InvalidResult {
            position,
            reason: "'index' must be an integer".to_string(),
        })?,
    };

    let payloads = match obj.remove("payloads") {
        None => Vec::new(),
        Some(serde_json::Value::Array(items)) => items,
        Some(_) => {
            return Err(CliError::InvalidResult {
                position,
                reason: "'payloads' must be an array".to_string(),
            });
        }
    };

    let mut result = FuzzResult::new(index);
    for (key, value) in obj {
        result = result.with_attribute(&key, json_to_value(value));
    }
    for payload in payloads {
        result = result.with_payload(json_to_value(payload));
    }
    Ok(result)
}

/// Render a result back to JSON with its (possibly rewritten) attributes.
pub fn result_to_json(result: &FuzzResult) -> serde_json::Value {
    let mut obj = Map::new();
    for name in METRICS {
        if let Some(value) = result.attribute(name) {
            obj.insert(name.to_string(), value_to_json(value.clone()));
        }
    }
    for (key, value) in result.attributes() {
        if !METRICS.contains(&key.as_str()) {
            obj.insert(key.clone(), value_to_json(value.clone()));
        }
    }
    obj.insert(
        "payloads".to_string(),
        serde_json::Value::Array(result.payloads().iter().cloned().map(value_to_json).collect()),
    );
    serde_json::Value::Object(obj)
}
