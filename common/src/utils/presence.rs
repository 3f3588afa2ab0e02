//! Presence checks for loosely typed request values.
//!
//! A value counts as present unless it is `null`, `false`, zero or an empty
//! string. Objects and arrays are present even when empty.

use serde_json::Value;
use validator::ValidationError;

/// Whether `value` counts as a supplied parameter.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `validator` hook around [`is_present`].
pub fn validate_present(value: &Value) -> Result<(), ValidationError> {
    if is_present(value) {
        Ok(())
    } else {
        Err(ValidationError::new("required"))
    }
}

/// Renders a scalar value as a path key (document id or revision).
///
/// Strings are used as-is; anything else is rendered as JSON text.
pub fn value_as_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
