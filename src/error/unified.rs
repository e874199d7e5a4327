//! Error classification shared by the agent and the conversation loop.

use strum::Display;
use thiserror::Error;

use super::ScoutError;

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    Unknown,
}

/// Coarse classification of an agent-call failure.
///
/// Every kind is handled the same way by the conversation loop today; the
/// classification is carried so callers can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AgentErrorKind {
    Authentication,
    Network,
    RateLimit,
    Unknown,
}

impl From<ErrorCategory> for AgentErrorKind {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Authentication => Self::Authentication,
            ErrorCategory::Network | ErrorCategory::Timeout => Self::Network,
            ErrorCategory::RateLimit => Self::RateLimit,
            _ => Self::Unknown,
        }
    }
}

/// Failure of a single agent invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AgentError {
    pub kind: AgentErrorKind,
    pub message: String,
}

impl AgentError {
    pub fn new(kind: AgentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::Unknown, message)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, AgentErrorKind::Network | AgentErrorKind::RateLimit)
    }
}

impl From<ScoutError> for AgentError {
    fn from(error: ScoutError) -> Self {
        Self::new(error.category().into(), error.to_string())
    }
}
