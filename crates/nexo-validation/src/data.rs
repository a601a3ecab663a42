//! Helpers over JSON input: dotted paths, wildcard expansion, normalization
//! and the loose comparisons used by conditional rules.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Request input and validated output
pub type Data = Map<String, Value>;

/// Stand-in for fields that are absent from the input
pub static NULL: Value = Value::Null;

/// Resolve a dotted path (`address.city`, `tags.0`) inside the input
pub fn get_path<'a>(data: &'a Data, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Expand `*` segments against the input.
///
/// `tags.*` over `{"tags": ["a", "b"]}` yields `tags.0` and `tags.1`; a
/// missing or non-collection parent yields nothing.
pub fn expand_wildcards(pattern: &str, data: &Data) -> Vec<String> {
    if !pattern.contains('*') {
        return vec![pattern.to_string()];
    }

    let root = Value::Object(data.clone());
    let mut paths: Vec<(String, &Value)> = vec![(String::new(), &root)];

    for segment in pattern.split('.') {
        let mut next = Vec::new();
        for (prefix, value) in paths {
            if segment == "*" {
                match value {
                    Value::Array(items) => {
                        for (index, item) in items.iter().enumerate() {
                            next.push((join(&prefix, &index.to_string()), item));
                        }
                    }
                    Value::Object(map) => {
                        for (key, item) in map {
                            next.push((join(&prefix, key), item));
                        }
                    }
                    _ => {}
                }
            } else {
                let child = match value {
                    Value::Object(map) => map.get(segment),
                    Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                    _ => None,
                };
                match child {
                    Some(child) => next.push((join(&prefix, segment), child)),
                    // a concrete trailing segment may legitimately be absent
                    None => next.push((join(&prefix, segment), &NULL)),
                }
            }
        }
        paths = next;
    }

    paths.into_iter().map(|(path, _)| path).collect()
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// Null, blank strings and empty collections count as "not filled"
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Trim every string and turn empty strings into null, recursively
pub fn normalize_input(data: &mut Data) {
    for value in data.values_mut() {
        normalize_value(value);
    }
}

fn normalize_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                *value = Value::Null;
            } else if trimmed.len() != s.len() {
                *value = Value::String(trimmed.to_string());
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_value),
        Value::Object(map) => map.values_mut().for_each(normalize_value),
        _ => {}
    }
}

/// Scalar text used by `in`, `required_if` and friends
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Bool(false) => Some("false".to_string()),
        _ => None,
    }
}

/// Compare a value with a rule argument, treating `1`/`true` and
/// `0`/`false` as the same for booleans.
pub fn loosely_equals(value: &Value, expected: &str) -> bool {
    match value {
        Value::Bool(b) => match expected {
            "true" | "1" => *b,
            "false" | "0" => !*b,
            _ => false,
        },
        Value::Number(n) => match (n.as_f64(), expected.parse::<f64>()) {
            (Some(a), Ok(b)) => a == b,
            _ => n.to_string() == expected,
        },
        Value::String(s) => s == expected,
        _ => false,
    }
}

/// Truthiness used when a cross-field hook reads a boolean flag
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.as_str(), "1" | "true" | "on" | "yes"),
        _ => false,
    }
}

/// Parse the date formats accepted by the `date` rule, normalized to UTC
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Numeric reading of a value, accepting numeric strings
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
