//! Chat transcript: the ordered, role-tagged messages of one session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;

use crate::config::DEFAULT_GREETING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    role: ChatRole,
    content: String,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> ChatRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Chronological message list, always starting with the assistant greeting.
///
/// Append-only: entries are never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(greeting)],
        }
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}
