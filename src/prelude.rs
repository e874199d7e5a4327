//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentFactory, AgentInput, AgentOutput, OpenAiAgentFactory};
pub use crate::config::ScoutConfig;
pub use crate::conversation::{process_submission, ChatSession, Transcript, Turn, TurnOutcome};
pub use crate::credentials::{resolve, CredentialPair, NoPrompt, ResolvedCredentials, SecretsChain};
pub use crate::error::{AgentError, AgentErrorKind, Result, ScoutError};
pub use crate::provider::ModelProvider;
pub use crate::tools::{TavilySearchTool, Tool, ToolArguments};
pub use crate::types::{GenerationSettings, ModelMessage, Role, Usage};
