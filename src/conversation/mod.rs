//! The conversation loop: one submission in, at most two transcript entries out.
//!
//! [`process_submission`] takes the transcript by value and hands it back in
//! the returned [`Turn`]; [`ChatSession`] wraps it with the loop's state
//! machine for interactive use.

pub mod session;
pub mod transcript;

pub use session::{ChatSession, LoopState};
pub use transcript::{ChatMessage, ChatRole, Transcript};

use tracing::{info, warn};

use crate::agent::{AgentFactory, AgentInput};
use crate::credentials::{ApiKeys, CredentialPair};
use crate::error::AgentError;

/// Shown when a submission arrives without both keys.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "❌ 未偵測到 API Key，請在側邊欄輸入。";

/// Shown when the agent call fails; embeds the error text.
pub fn failure_message(error: &AgentError) -> String {
    format!("發生錯誤：{error}")
}

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// Rejected before anything was appended.
    MissingCredentials { message: String },
    /// User message and reply both appended.
    Replied { text: String },
    /// Only the user message was appended.
    Failed { message: String, error: AgentError },
}

impl TurnOutcome {
    /// The inline error to display, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::MissingCredentials { message } | Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// The transcript after a submission, and how the submission went.
#[derive(Debug, Clone)]
pub struct Turn {
    pub transcript: Transcript,
    pub outcome: TurnOutcome,
}

/// Handle one user submission.
///
/// Credentials are checked before anything is appended. The agent is built
/// from the keys for this submission and invoked with `system_instruction`,
/// the submission, and an empty scratchpad.
pub async fn process_submission(
    mut transcript: Transcript,
    credentials: &CredentialPair,
    agents: &dyn AgentFactory,
    system_instruction: &str,
    submission: &str,
) -> Turn {
    let keys = match admit(credentials, submission) {
        Ok(keys) => keys,
        Err(outcome) => {
            return Turn {
                transcript,
                outcome,
            }
        }
    };

    let question = ChatMessage::user(submission);
    let result = answer(agents, &keys, system_instruction, submission).await;
    let outcome = settle(&mut transcript, question, result);

    Turn {
        transcript,
        outcome,
    }
}

/// Gate a submission. `Err` carries the outcome for input that never
/// reaches the agent.
pub(crate) fn admit(credentials: &CredentialPair, submission: &str) -> Result<ApiKeys, TurnOutcome> {
    if submission.trim().is_empty() {
        return Err(TurnOutcome::Ignored);
    }
    credentials.api_keys().ok_or_else(|| {
        warn!(missing = ?credentials.missing(), "submission rejected: missing credentials");
        TurnOutcome::MissingCredentials {
            message: MISSING_CREDENTIALS_MESSAGE.to_string(),
        }
    })
}

/// Build an agent for `keys` and run it once. Touches no transcript.
pub(crate) async fn answer(
    agents: &dyn AgentFactory,
    keys: &ApiKeys,
    system_instruction: &str,
    submission: &str,
) -> Result<String, AgentError> {
    let agent = agents.build(keys)?;
    agent
        .invoke(AgentInput::new(system_instruction, submission))
        .await
        .map(|out| out.output)
}

/// Append the question and, on success, the reply.
pub(crate) fn settle(
    transcript: &mut Transcript,
    question: ChatMessage,
    result: Result<String, AgentError>,
) -> TurnOutcome {
    transcript.push(question);
    match result {
        Ok(text) => {
            info!(chars = text.chars().count(), "reply received");
            transcript.push(ChatMessage::assistant(text.clone()));
            TurnOutcome::Replied { text }
        }
        Err(error) => {
            warn!(kind = %error.kind, error = %error, "agent call failed");
            TurnOutcome::Failed {
                message: failure_message(&error),
                error,
            }
        }
    }
}
