//! Attribute value to key text
//!
//! | Value | Key text |
//! |-------|----------|
//! | string | the string itself, unquoted |
//! | number | the digits as written in the record (`30`, `1.0`, `1e400`) |
//! | boolean | `true` / `false` |
//! | array, object | compact JSON text; object keys come out sorted (`{"z":1,"a":2}` renders as `{"a":2,"z":1}`) |
//! | null | no text form: `ValueUnrepresentable` |

use docindex_core::{ExtractionFailure, Result};
use serde_json::Value;
use std::borrow::Cow;

/// JSON type name of a value, for diagnostics
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render the value of `attribute` as key text
///
/// Strings are borrowed from the document; everything else is formatted.
pub fn render_text<'v>(attribute: &str, value: &'v Value) -> Result<Cow<'v, str>> {
    match value {
        Value::String(s) => Ok(Cow::Borrowed(s.as_str())),
        Value::Bool(true) => Ok(Cow::Borrowed("true")),
        Value::Bool(false) => Ok(Cow::Borrowed("false")),
        Value::Number(n) => Ok(Cow::Owned(n.to_string())),
        Value::Array(_) | Value::Object(_) => Ok(Cow::Owned(value.to_string())),
        Value::Null => Err(ExtractionFailure::ValueUnrepresentable {
            attribute: attribute.to_string(),
            kind: value_kind(value),
        }),
    }
}
