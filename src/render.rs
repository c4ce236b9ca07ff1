//! Value renderer: turns any serializable message into log text.
//!
//! Strings pass through untouched, arrays and objects are pretty-printed as
//! JSON, and other scalars use their literal JSON spelling (`42`, `true`,
//! `null`). Nothing is ever rejected; a value serde cannot represent is
//! rendered as a short placeholder describing the failure.

use serde::Serialize;
use serde_json::Value;

/// Converts `message` into a [`Value`] without failing.
pub fn to_value<M: Serialize + ?Sized>(message: &M) -> Value {
    serde_json::to_value(message)
        .unwrap_or_else(|e| Value::String(format!("<unrenderable value: {e}>")))
}

/// Renders a value as log text.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        scalar => scalar.to_string(),
    }
}

/// Serializes and renders `message` in one step.
pub fn render<M: Serialize + ?Sized>(message: &M) -> String {
    render_value(&to_value(message))
}
