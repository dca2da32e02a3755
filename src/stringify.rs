// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::errors::ResolveError;
use crate::value::Value;

/// Text used for a null result.
pub const NULL_TEXT: &str = "<nil>";

/// Render a scalar result as a label value.
///
/// Floats use the shortest representation that round-trips, so `1.0`
/// renders as `1`. Code points render as their decimal value. Lists and
/// maps have no label form.
pub fn stringify(value: &Value) -> Result<String, ResolveError> {
    match value {
        Value::Null => Ok(NULL_TEXT.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::CodePoint(c) => Ok(u32::from(*c).to_string()),
        Value::String(s) => Ok(s.to_string()),
        Value::Array(_) | Value::Object(_) => Err(ResolveError::UnsupportedResult(value.kind())),
    }
}
