//! Credential resolution.
//!
//! The two API keys are resolved once per session from a prioritized list of
//! sources and handed around as a [`CredentialPair`] value. Nothing here
//! writes to the process environment; clients receive their key through
//! their constructors.

pub mod resolver;
pub mod secrets;

pub use resolver::{resolve, CredentialPrompt, NoPrompt};
pub use secrets::{EnvSecrets, SecretsChain, SecretsFile, SecretsSource};

use secrecy::{ExposeSecret, SecretString};
use strum::{Display, IntoStaticStr};

/// One of the two keys the assistant needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum CredentialKey {
    #[strum(serialize = "OPENAI_API_KEY")]
    LanguageModel,
    #[strum(serialize = "TAVILY_API_KEY")]
    Search,
}

impl CredentialKey {
    pub const ALL: [CredentialKey; 2] = [CredentialKey::LanguageModel, CredentialKey::Search];

    /// Entry name in secrets stores and the environment.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Label shown next to the interactive input.
    pub fn label(self) -> &'static str {
        match self {
            Self::LanguageModel => "OpenAI Key",
            Self::Search => "Tavily Key",
        }
    }
}

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CredentialSource {
    SecretsFile,
    Environment,
    Interactive,
}

/// The language-model key and the search key, each possibly absent.
///
/// Present fields are never empty. `Debug` output redacts the values.
#[derive(Debug, Clone, Default)]
pub struct CredentialPair {
    pub language_model_key: Option<SecretString>,
    pub search_key: Option<SecretString>,
}

impl CredentialPair {
    /// Build a pair from raw strings; blank values count as absent.
    pub fn new(language_model_key: &str, search_key: &str) -> Self {
        Self {
            language_model_key: non_blank(language_model_key),
            search_key: non_blank(search_key),
        }
    }

    pub fn get(&self, key: CredentialKey) -> Option<&SecretString> {
        match key {
            CredentialKey::LanguageModel => self.language_model_key.as_ref(),
            CredentialKey::Search => self.search_key.as_ref(),
        }
    }

    fn set(&mut self, key: CredentialKey, value: SecretString) {
        match key {
            CredentialKey::LanguageModel => self.language_model_key = Some(value),
            CredentialKey::Search => self.search_key = Some(value),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn missing(&self) -> Vec<CredentialKey> {
        CredentialKey::ALL
            .into_iter()
            .filter(|key| self.get(*key).is_none())
            .collect()
    }

    /// Both keys, if both are present.
    pub fn api_keys(&self) -> Option<ApiKeys> {
        Some(ApiKeys {
            language_model: self.language_model_key.clone()?,
            search: self.search_key.clone()?,
        })
    }
}

/// A complete pair; the only form the agent can be built from.
#[derive(Debug, Clone)]
pub struct ApiKeys {
    pub language_model: SecretString,
    pub search: SecretString,
}

/// Result of a resolution pass: the pair plus provenance per key.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCredentials {
    pub pair: CredentialPair,
    pub language_model_source: Option<CredentialSource>,
    pub search_source: Option<CredentialSource>,
}

impl ResolvedCredentials {
    pub fn source(&self, key: CredentialKey) -> Option<CredentialSource> {
        match key {
            CredentialKey::LanguageModel => self.language_model_source,
            CredentialKey::Search => self.search_source,
        }
    }

    fn record(&mut self, key: CredentialKey, value: SecretString, source: CredentialSource) {
        self.pair.set(key, value);
        match key {
            CredentialKey::LanguageModel => self.language_model_source = Some(source),
            CredentialKey::Search => self.search_source = Some(source),
        }
    }
}

/// Mask a secret for display: keeps a short prefix and suffix.
pub fn mask_secret(secret: &SecretString) -> String {
    let value = secret.expose_secret();
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub(crate) fn non_blank(value: &str) -> Option<SecretString> {
    if value.trim().is_empty() {
        None
    } else {
        Some(SecretString::from(value.to_string()))
    }
}
