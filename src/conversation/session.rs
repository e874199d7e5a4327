//! Interactive chat session with an explicit loop state.

use std::sync::Arc;

use strum::Display;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{admit, answer, settle, ChatMessage, Transcript, TurnOutcome};
use crate::agent::AgentFactory;
use crate::config::ScoutConfig;
use crate::credentials::ResolvedCredentials;

/// Where the loop is between submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoopState {
    Idle,
    AwaitingInput,
    Processing,
    Displaying,
    Error,
}

impl LoopState {
    pub fn can_transition_to(self, next: LoopState) -> bool {
        use LoopState::*;
        matches!(
            (self, next),
            (Idle, AwaitingInput)
                | (AwaitingInput, Processing)
                | (AwaitingInput, Error)
                | (Processing, Displaying)
                | (Processing, Error)
                | (Processing, AwaitingInput)
                | (Displaying, Idle)
                | (Error, Idle)
                | (Error, AwaitingInput)
        )
    }
}

/// A transcript, the credentials in force, and the factory that builds an
/// agent for each submission.
pub struct ChatSession {
    id: Uuid,
    transcript: Transcript,
    credentials: ResolvedCredentials,
    agents: Arc<dyn AgentFactory>,
    system_instruction: String,
    state: LoopState,
    trail: Vec<LoopState>,
}

impl ChatSession {
    pub fn new(
        config: &ScoutConfig,
        credentials: ResolvedCredentials,
        agents: Arc<dyn AgentFactory>,
    ) -> Self {
        let id = Uuid::new_v4();
        info!(session = %id, complete = credentials.pair.is_complete(), "session started");
        Self {
            id,
            transcript: Transcript::new(config.greeting.clone()),
            credentials,
            agents,
            system_instruction: config.system_instruction.clone(),
            state: LoopState::Idle,
            trail: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn credentials(&self) -> &ResolvedCredentials {
        &self.credentials
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// States passed through during the most recent [`submit`](Self::submit).
    pub fn last_transitions(&self) -> &[LoopState] {
        &self.trail
    }

    /// Transcript has been shown; wait for the next submission.
    pub fn await_input(&mut self) {
        if self.state != LoopState::AwaitingInput {
            self.transition(LoopState::AwaitingInput);
        }
    }

    /// Replace the credentials in force. The transcript is kept.
    pub fn refresh_credentials(&mut self, credentials: ResolvedCredentials) {
        info!(
            session = %self.id,
            complete = credentials.pair.is_complete(),
            "credentials refreshed"
        );
        self.credentials = credentials;
    }

    pub async fn submit(&mut self, submission: &str) -> TurnOutcome {
        self.submit_with(submission, |_| {}).await
    }

    /// [`submit`](Self::submit), calling `on_state` as each state is entered.
    ///
    /// The transcript is written only after the agent call returns. Dropping
    /// the future mid-call leaves it untouched and the session in
    /// [`LoopState::Processing`]; the next submission starts over from there.
    pub async fn submit_with(
        &mut self,
        submission: &str,
        mut on_state: impl FnMut(LoopState),
    ) -> TurnOutcome {
        self.trail.clear();
        if self.state == LoopState::Processing {
            warn!(session = %self.id, "previous submission was abandoned");
        }
        if self.state != LoopState::AwaitingInput {
            self.step(LoopState::AwaitingInput, &mut on_state);
        }

        let keys = match admit(&self.credentials.pair, submission) {
            Ok(keys) => keys,
            Err(outcome) => {
                if let TurnOutcome::MissingCredentials { .. } = outcome {
                    self.step(LoopState::Error, &mut on_state);
                    self.step(LoopState::AwaitingInput, &mut on_state);
                }
                return outcome;
            }
        };

        self.step(LoopState::Processing, &mut on_state);
        let question = ChatMessage::user(submission);
        let result = answer(
            self.agents.as_ref(),
            &keys,
            &self.system_instruction,
            submission,
        )
        .await;
        let outcome = settle(&mut self.transcript, question, result);

        let path = match &outcome {
            TurnOutcome::Replied { .. } => [LoopState::Displaying, LoopState::Idle],
            _ => [LoopState::Error, LoopState::Idle],
        };
        for next in path {
            self.step(next, &mut on_state);
        }

        outcome
    }

    fn step(&mut self, next: LoopState, on_state: &mut impl FnMut(LoopState)) {
        self.transition(next);
        on_state(next);
    }

    fn transition(&mut self, next: LoopState) {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "unexpected loop transition");
        }
        debug!(session = %self.id, from = %self.state, to = %next, "loop transition");
        self.state = next;
        self.trail.push(next);
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("messages", &self.transcript.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
