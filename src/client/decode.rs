//! JSON decoding and top-level shape checks for bd output.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{BdError, Result};

/// Expected top-level shape of a JSON command's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectShape {
    /// A list. Empty output (decoded as `{}`) counts as an empty list.
    Array,
    /// A single object.
    Object,
    /// A single record that bd may wrap in an array.
    ArrayNonEmpty,
}

/// Parse bd's JSON stdout. Empty or whitespace-only output decodes to `{}`.
pub fn decode_json(stdout: &str) -> Result<Value> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(trimmed).map_err(|err| BdError::Command {
        message: format!("Failed to parse bd JSON output: {err}"),
        stderr: trimmed.to_string(),
        returncode: 1,
    })
}

/// Check `value` against `shape`, unwrapping single-record arrays.
///
/// `operation` names the command in the error; `subject` is the ID used for
/// "Issue not found" when an [`ExpectShape::ArrayNonEmpty`] result is empty.
pub fn expect_shape(
    value: Value,
    shape: ExpectShape,
    operation: &str,
    subject: &str,
) -> Result<Value> {
    match (shape, value) {
        (ExpectShape::Array, value @ Value::Array(_)) => Ok(value),
        (ExpectShape::Array, Value::Object(map)) if map.is_empty() => Ok(Value::Array(Vec::new())),
        (ExpectShape::Object, value @ Value::Object(_)) => Ok(value),
        (ExpectShape::ArrayNonEmpty, value @ Value::Object(_)) => Ok(value),
        (ExpectShape::ArrayNonEmpty, Value::Array(items)) => match items.into_iter().next() {
            Some(first @ Value::Object(_)) => Ok(first),
            Some(_) => Err(BdError::invalid_response(operation)),
            None => Err(BdError::issue_not_found(subject)),
        },
        _ => Err(BdError::invalid_response(operation)),
    }
}

/// Deserialize a shape-checked value into its typed record.
pub fn into_typed<T: DeserializeOwned>(value: Value, operation: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|err| BdError::command(format!("Invalid response for {operation}: {err}")))
}
