//! Accessors over state and plan trees.

use serde_json::Value;

/// Whether the value is set: neither `null` nor unknown.
pub fn is_defined(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

/// A string attribute.
pub fn get_str<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    value.get(name).and_then(Value::as_str)
}

/// A string attribute, owned.
pub fn opt_string(value: &Value, name: &str) -> Option<String> {
    get_str(value, name).map(str::to_string)
}

/// A string attribute that is set and not empty.
pub fn non_empty_str<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    get_str(value, name).filter(|s| !s.is_empty())
}

/// A bool attribute.
pub fn get_bool(value: &Value, name: &str) -> Option<bool> {
    value.get(name).and_then(Value::as_bool)
}

/// A bool attribute, `false` when unset.
pub fn bool_or_false(value: &Value, name: &str) -> bool {
    get_bool(value, name).unwrap_or(false)
}

/// An int64 attribute.
pub fn get_i64(value: &Value, name: &str) -> Option<i64> {
    value.get(name).and_then(Value::as_i64)
}

/// The string elements of a list or set attribute.
pub fn string_set(value: &Value, name: &str) -> Option<Vec<String>> {
    value.get(name).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

/// Number of elements in a list, set or map attribute. Unset counts as zero.
pub fn len(value: &Value, name: &str) -> usize {
    match value.get(name) {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(entries)) => entries.len(),
        _ => 0,
    }
}

/// State value for an optional string.
pub fn string_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.to_string()))
}

/// State value for a string set. An absent set becomes `null`.
pub fn set_value(values: Option<&[String]>) -> Value {
    values.map_or(Value::Null, |values| {
        Value::Array(values.iter().cloned().map(Value::String).collect())
    })
}

/// State value for a string set where absent means empty.
pub fn set_value_or_empty(values: Option<&[String]>) -> Value {
    Value::Array(
        values
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(Value::String)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let value = json!({
            "name": "SMTP",
            "empty": "",
            "enabled": true,
            "cache_duration": 1440,
            "grant_types": ["CLIENT_CREDENTIALS", "REFRESH_TOKEN"],
            "unknown": null
        });

        assert_eq!(get_str(&value, "name"), Some("SMTP"));
        assert_eq!(non_empty_str(&value, "empty"), None);
        assert_eq!(get_bool(&value, "enabled"), Some(true));
        assert!(!bool_or_false(&value, "missing"));
        assert_eq!(get_i64(&value, "cache_duration"), Some(1440));
        assert_eq!(len(&value, "grant_types"), 2);
        assert_eq!(
            string_set(&value, "grant_types"),
            Some(vec![
                "CLIENT_CREDENTIALS".to_string(),
                "REFRESH_TOKEN".to_string()
            ])
        );
        assert!(!is_defined(value.get("unknown")));
        assert!(!is_defined(value.get("missing")));
        assert!(is_defined(value.get("empty")));
    }

    #[test]
    fn test_state_values() {
        assert_eq!(string_value(None), Value::Null);
        assert_eq!(set_value(None), Value::Null);
        assert_eq!(set_value_or_empty(None), json!([]));
        assert_eq!(
            set_value(Some(&["a".to_string()])),
            json!(["a"])
        );
    }
}
