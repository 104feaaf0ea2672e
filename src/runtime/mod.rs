//! Capability handlers invoked by the dispatch table.
//!
//! Each submodule contributes `impl ExecutionContext` methods for one
//! concern. Handlers write their user-visible results to the context's
//! output buffer and return the normalized operation descriptor; semantic
//! failures come back as `RuntimeError` and are reported by the
//! dispatcher without stopping the run.

use regex::Captures;

use crate::value::{RuntimeError, Value};

mod database;
mod datetime;
mod files;
mod http;
mod lists;
mod math;
mod output;
pub(crate) mod rng;
mod session;
mod strings;
mod system;
mod variables;

/// Capture group as text; required groups always exist once the pattern
/// matched, so a missing group reads as empty rather than panicking.
pub(crate) fn cap<'a>(caps: &'a Captures<'_>, i: usize) -> &'a str {
    caps.get(i).map_or("", |m| m.as_str())
}

pub(crate) fn cap_f64(caps: &Captures<'_>, i: usize) -> Result<f64, RuntimeError> {
    let text = cap(caps, i);
    text.parse::<f64>()
        .map_err(|_| RuntimeError::new(format!("'{}' is not a number", text)))
}

pub(crate) fn cap_i64(caps: &Captures<'_>, i: usize) -> Result<i64, RuntimeError> {
    let text = cap(caps, i);
    text.parse::<i64>()
        .map_err(|_| RuntimeError::new(format!("'{}' is not an integer", text)))
}

pub(crate) fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(|c| c == '\'' || c == '"')
}

/// Comma-separated fragment into values: quotes stripped, integers
/// parsed, everything else kept as a string.
pub(crate) fn split_values(text: &str) -> Vec<Value> {
    text.split(',').map(Value::from_literal).collect()
}

/// Comma-separated fragment into plain trimmed, unquoted strings.
pub(crate) fn split_strings(text: &str) -> Vec<String> {
    text.split(',').map(|s| strip_quotes(s).to_string()).collect()
}

pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(x) => serde_json::Value::from(*x),
        Value::Str(s) => serde_json::Value::from(s.as_str()),
        Value::Bool(b) => serde_json::Value::from(*b),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
    }
}

pub(crate) fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Str(String::new()),
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(items) => Value::List(items.iter().map(json_to_value).collect()),
        // Objects have no counterpart in the value model; keep the text.
        other => Value::Str(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_values_parses_ints_and_strips_quotes() {
        let values = split_values("1, 'two', 3");
        assert_eq!(
            values,
            vec![
                Value::Int(1),
                Value::Str("two".to_string()),
                Value::Int(3)
            ]
        );
    }

    #[test]
    fn json_round_trip() {
        let value = Value::List(vec![
            Value::Int(1),
            Value::Str("a".to_string()),
            Value::Bool(true),
            Value::Float(2.5),
        ]);
        assert_eq!(json_to_value(&value_to_json(&value)), value);
    }
}
