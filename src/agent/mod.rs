//! The agent the conversation loop talks to.
//!
//! An [`Agent`] takes a system instruction, one user input, and a scratchpad
//! (empty at the start of every submission) and returns the final text. How
//! many model and tool calls happen in between is its own business.

pub mod executor;

pub use executor::{ToolCallingAgent, ITERATION_LIMIT_MESSAGE};

use async_trait::async_trait;

use crate::config::ScoutConfig;
use crate::credentials::ApiKeys;
use crate::error::AgentError;
use crate::types::{ModelMessage, ToolCall, ToolResult, Usage};

/// Everything one agent invocation sees.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentInput {
    pub system: String,
    pub input: String,
    /// Intermediate tool-use messages; callers start it empty.
    pub scratchpad: Vec<ModelMessage>,
}

impl AgentInput {
    pub fn new(system: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            input: input.into(),
            scratchpad: Vec::new(),
        }
    }
}

/// A tool call the agent made and what came back.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStep {
    pub call: ToolCall,
    pub observation: ToolResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutput {
    pub output: String,
    pub steps: Vec<AgentStep>,
    pub usage: Usage,
}

#[async_trait]
pub trait Agent: Send + Sync {
    async fn invoke(&self, input: AgentInput) -> Result<AgentOutput, AgentError>;
}

/// Builds an agent from a complete key pair.
///
/// The loop builds a fresh agent per submission, so keys replaced by a
/// session refresh take effect on the next question.
pub trait AgentFactory: Send + Sync {
    fn build(&self, keys: &ApiKeys) -> Result<Box<dyn Agent>, AgentError>;
}

/// Factory for the OpenAI + Tavily agent.
#[derive(Debug, Clone)]
pub struct OpenAiAgentFactory {
    config: ScoutConfig,
}

impl OpenAiAgentFactory {
    pub fn new(config: ScoutConfig) -> Self {
        Self { config }
    }
}

impl AgentFactory for OpenAiAgentFactory {
    fn build(&self, keys: &ApiKeys) -> Result<Box<dyn Agent>, AgentError> {
        Ok(Box::new(ToolCallingAgent::from_config(&self.config, keys)?))
    }
}
