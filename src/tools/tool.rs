//! The tool trait.

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::ToolParameters;
use crate::error::ScoutError;
use crate::provider::ToolDefinition;

/// A capability the model may call by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Execute the tool with parsed arguments.
    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, ScoutError>;

    /// The definition advertised to the provider.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters().schema.clone(),
        }
    }
}
