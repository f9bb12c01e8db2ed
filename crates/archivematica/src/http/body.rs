//! Helpers for checking decoded response bodies.

use serde_json::Value;

use crate::error::Error;
use crate::record::Record;

/// Fetch a key that a successful response must carry.
pub(crate) fn require<'a>(body: &'a Value, key: &str, failure: &str) -> Result<&'a Value, Error> {
    body.get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| Error::request(None, failure))
}

/// Fetch a key and render it as a string. Numbers are accepted for ids.
pub(crate) fn require_string(body: &Value, key: &str, failure: &str) -> Result<String, Error> {
    match require(body, key, failure)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::request(None, failure)),
    }
}

/// Whether `message` matches `expected`, ignoring ASCII case.
pub(crate) fn message_is(body: &Value, expected: &str) -> bool {
    body.get("message")
        .and_then(Value::as_str)
        .is_some_and(|m| m.eq_ignore_ascii_case(expected))
}

/// Read an array of objects, skipping entries that are not objects.
pub(crate) fn records(value: &Value) -> Vec<Record> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| Record::from_value(item.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Read an array of strings, rendering numbers as strings.
pub(crate) fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Turn a whole body into a record.
pub(crate) fn into_record(body: Value, failure: &str) -> Result<Record, Error> {
    Record::from_value(body).ok_or_else(|| Error::request(None, failure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_counts_as_missing() {
        let body = json!({"path": null});
        let err = require(&body, "path", "missing 'path' element").unwrap_err();
        assert_eq!(err.to_string(), "missing 'path' element");
    }

    #[test]
    fn numeric_ids_become_strings() {
        assert_eq!(require_string(&json!({"id": 14}), "id", "x").unwrap(), "14");
    }

    #[test]
    fn message_compare_ignores_case() {
        let body = json!({"message": "fetched units SUCCESSFULLY."});
        assert!(message_is(&body, "Fetched units successfully."));
        assert!(!message_is(&json!({}), "Fetched units successfully."));
    }

    #[test]
    fn records_skip_scalars() {
        let value = json!([{"uuid": "a"}, 3, {"uuid": "b"}]);
        let uuids: Vec<_> = records(&value)
            .iter()
            .filter_map(|r| r.uuid().map(str::to_string))
            .collect();
        assert_eq!(uuids, vec!["a", "b"]);
    }
}
