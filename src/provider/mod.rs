//! Model provider trait and the OpenAI implementation.

pub mod http;
pub mod openai;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::types::{FinishReason, GenerationSettings, ModelMessage, ToolCall, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// A chat model the agent can drive.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate one non-streaming reply.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, ScoutError>;
}
