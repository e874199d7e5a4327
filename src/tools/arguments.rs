//! Typed access to tool call arguments.

use crate::error::ScoutError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    /// Models occasionally send the arguments object as a JSON string;
    /// such strings are decoded here.
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => {
                serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
            }
            other => other,
        };
        Self { value }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, ScoutError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ScoutError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }
}
