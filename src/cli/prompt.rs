//! Masked terminal input for missing API keys.

use console::{style, Term};
use dialoguer::Password;
use tracing::warn;

use super::SETTINGS_HEADER;
use crate::credentials::{CredentialKey, CredentialPrompt};

/// Asks on stderr so stdout carries only the conversation.
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn begin(&mut self, _missing: &[CredentialKey]) {
        let _ = self.term.write_line("");
        let _ = self
            .term
            .write_line(&format!("  {}", style(SETTINGS_HEADER).bold()));
    }

    fn ask(&mut self, key: CredentialKey) -> Option<String> {
        match Password::new()
            .with_prompt(format!("  {}", key.label()))
            .allow_empty_password(true)
            .interact_on(&self.term)
        {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = key.name(), error = %e, "could not read key from terminal");
                None
            }
        }
    }
}
