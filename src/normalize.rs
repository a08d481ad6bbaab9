//! Upstream response validation
//!
//! A body is usable only if it is a JSON object carrying the provider's
//! marker field. Valid bodies pass through untouched: no renaming, no unit
//! conversion.

use serde_json::Value;

use crate::error::ToolError;

/// Pass `body` through if `marker` is a top-level key, otherwise reject it
pub fn require_marker(body: Value, marker: &'static str) -> Result<Value, ToolError> {
    let present = body.as_object().is_some_and(|obj| obj.contains_key(marker));
    if present {
        Ok(body)
    } else {
        tracing::error!(marker, body = %body, "Upstream response is missing its marker field");
        Err(ToolError::InvalidFormat { marker })
    }
}
