//! JSON utility functions

use serde_json::Value as JsonValue;

/// Render a JSON value as dataset cell text.
///
/// - Strings are returned verbatim (no surrounding quotes)
/// - Numbers and booleans use their natural form (`72`, `1.5`, `true`)
/// - `null` renders as the empty string
/// - Objects and arrays render as compact JSON, keys in recorded order
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use traceset::utils::json::stringify_value;
///
/// assert_eq!(stringify_value(&json!("sunny")), "sunny");
/// assert_eq!(stringify_value(&json!(72)), "72");
/// assert_eq!(stringify_value(&json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
/// ```
pub fn stringify_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            // serde_json::to_string on a Value only fails for exotic map keys,
            // which a parsed Value cannot carry; Display is the last resort
            serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// Stringify an optional value, treating absence like `null`.
pub fn stringify_opt(value: Option<&JsonValue>) -> String {
    value.map(stringify_value).unwrap_or_default()
}

/// Returns true for values that can be descended into (objects and arrays).
#[inline]
pub fn is_record(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Object(_) | JsonValue::Array(_))
}

/// Drop `null` so that "no value" has exactly one representation.
#[inline]
pub fn non_null(value: Option<JsonValue>) -> Option<JsonValue> {
    value.filter(|v| !v.is_null())
}
