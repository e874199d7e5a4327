//! Per-key resolution: managed secrets first, then the interactive prompt.

use tracing::info;

use super::{non_blank, CredentialKey, CredentialSource, ResolvedCredentials, SecretsChain};

/// Interactive input for keys the managed sources did not supply.
pub trait CredentialPrompt {
    /// Called once before any `ask`, with every key that will be asked for.
    fn begin(&mut self, _missing: &[CredentialKey]) {}

    /// Raw user input for `key`; `None` when the user gave nothing.
    fn ask(&mut self, key: CredentialKey) -> Option<String>;
}

/// Prompt that never supplies anything (non-interactive runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl CredentialPrompt for NoPrompt {
    fn ask(&mut self, _key: CredentialKey) -> Option<String> {
        None
    }
}

/// Resolve both keys independently.
///
/// The prompt is consulted only for keys absent from `secrets`, and not at
/// all when both are found. Interactive input is trimmed; blank input leaves
/// the key absent.
pub fn resolve(secrets: &SecretsChain, prompt: &mut dyn CredentialPrompt) -> ResolvedCredentials {
    let mut resolved = ResolvedCredentials::default();
    let mut missing = Vec::new();

    for key in CredentialKey::ALL {
        match secrets.find(key.name()) {
            Some((secret, source)) => {
                info!(key = key.name(), %source, "credential resolved");
                resolved.record(key, secret, source);
            }
            None => missing.push(key),
        }
    }

    if missing.is_empty() {
        return resolved;
    }

    prompt.begin(&missing);
    for key in missing {
        let entered = prompt.ask(key).and_then(|raw| non_blank(raw.trim()));
        match entered {
            Some(secret) => {
                info!(key = key.name(), source = %CredentialSource::Interactive, "credential resolved");
                resolved.record(key, secret, CredentialSource::Interactive);
            }
            None => info!(key = key.name(), "credential missing"),
        }
    }

    resolved
}
