//! Raw form field values
//!
//! The upstream capture form submits numeric fields either as JSON numbers
//! or as free text (operators in the field frequently type a comma as the
//! decimal separator). `RawValue` preserves exactly what was entered so the
//! diagnostics engine can decide how to interpret it.

use serde::{Deserialize, Serialize};

/// A field value as supplied by the capture form
///
/// Untagged on the wire: `21.5` deserializes as `Number`, `"21,5"` as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// True when the value carries no usable content (empty or
    /// whitespace-only text). Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Number(_) => false,
            RawValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// True for the capture form's "unfilled" state on optional numeric
    /// fields: blank text, or an exact zero left at the widget default.
    pub fn is_blank_or_zero(&self) -> bool {
        match self {
            RawValue::Number(n) => *n == 0.0,
            RawValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Pass-through JSON value for the rendering context
    ///
    /// Numbers stay numeric; text is uppercased the way all user-entered
    /// text is rendered in the final document.
    pub fn to_context_value(&self) -> serde_json::Value {
        match self {
            RawValue::Number(n) => serde_json::Value::from(*n),
            RawValue::Text(s) => serde_json::Value::String(s.to_uppercase()),
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}
