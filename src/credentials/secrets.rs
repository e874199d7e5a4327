//! Read-only managed secrets sources.
//!
//! A lookup that fails for any reason (missing file, unreadable file,
//! malformed TOML, missing or non-string entry) reports "not found".

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, warn};

use super::{non_blank, CredentialSource};
use crate::config::{default_dir, ScoutConfig};

/// A source of named secrets.
pub trait SecretsSource: Send + Sync {
    /// Which kind of source this is, for provenance reporting.
    fn kind(&self) -> CredentialSource;

    /// Look up a secret by entry name. Blank values are reported as absent.
    fn lookup(&self, name: &str) -> Option<SecretString>;
}

/// Flat TOML table of secrets, e.g.
///
/// ```toml
/// OPENAI_API_KEY = "sk-..."
/// TAVILY_API_KEY = "tvly-..."
/// ```
///
/// The file is re-read on every lookup so a session refresh sees edits.
#[derive(Debug, Clone)]
pub struct SecretsFile {
    path: PathBuf,
}

impl SecretsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_table(&self) -> Option<toml::Table> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "secrets file unreadable");
                return None;
            }
        };
        match toml::from_str::<toml::Table>(&raw) {
            Ok(table) => Some(table),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "secrets file is not valid TOML");
                None
            }
        }
    }
}

impl SecretsSource for SecretsFile {
    fn kind(&self) -> CredentialSource {
        CredentialSource::SecretsFile
    }

    fn lookup(&self, name: &str) -> Option<SecretString> {
        let table = self.load_table()?;
        table.get(name).and_then(|v| v.as_str()).and_then(non_blank)
    }
}

/// Process environment, read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretsSource for EnvSecrets {
    fn kind(&self) -> CredentialSource {
        CredentialSource::Environment
    }

    fn lookup(&self, name: &str) -> Option<SecretString> {
        std::env::var(name).ok().as_deref().and_then(non_blank)
    }
}

/// Ordered list of sources; the first one holding an entry wins.
#[derive(Default)]
pub struct SecretsChain {
    sources: Vec<Box<dyn SecretsSource>>,
}

impl SecretsChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl SecretsSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Secrets file (configured path, else the first existing default
    /// location) followed by the environment.
    pub fn standard(config: &ScoutConfig) -> Self {
        let mut chain = Self::new();
        if let Some(path) = config.secrets_path.clone().or_else(discover_secrets_file) {
            debug!(path = %path.display(), "using secrets file");
            chain = chain.with_source(SecretsFile::new(path));
        }
        chain.with_source(EnvSecrets)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<(SecretString, CredentialSource)> {
        self.sources
            .iter()
            .find_map(|source| source.lookup(name).map(|secret| (secret, source.kind())))
    }
}

impl std::fmt::Debug for SecretsChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsChain")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn discover_secrets_file() -> Option<PathBuf> {
    [
        PathBuf::from("secrets.toml"),
        PathBuf::from(".streamlit").join("secrets.toml"),
        default_dir().join("secrets.toml"),
    ]
    .into_iter()
    .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn write_secrets(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn secrets_file_returns_string_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_secrets(&dir, "OPENAI_API_KEY = \"sk-file\"\n");
        let file = SecretsFile::new(path);

        let secret = file.lookup("OPENAI_API_KEY").unwrap();
        assert_eq!(secret.expose_secret(), "sk-file");
        assert!(file.lookup("TAVILY_API_KEY").is_none());
    }

    #[test]
    fn missing_file_is_not_found() {
        let file = SecretsFile::new("/no/such/dir/secrets.toml");
        assert!(file.lookup("OPENAI_API_KEY").is_none());
    }

    #[test]
    fn malformed_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = write_secrets(&dir, "OPENAI_API_KEY = \n[[[");
        assert!(SecretsFile::new(path).lookup("OPENAI_API_KEY").is_none());
    }

    #[test]
    fn non_string_and_blank_entries_are_not_found() {
        let dir = TempDir::new().unwrap();
        let path = write_secrets(&dir, "OPENAI_API_KEY = 42\nTAVILY_API_KEY = \"  \"\n");
        let file = SecretsFile::new(path);
        assert!(file.lookup("OPENAI_API_KEY").is_none());
        assert!(file.lookup("TAVILY_API_KEY").is_none());
    }

    #[test]
    fn file_edits_are_visible_on_next_lookup() {
        let dir = TempDir::new().unwrap();
        let path = write_secrets(&dir, "");
        let file = SecretsFile::new(path.clone());
        assert!(file.lookup("TAVILY_API_KEY").is_none());

        std::fs::write(&path, "TAVILY_API_KEY = \"tvly-new\"\n").unwrap();
        assert_eq!(file.lookup("TAVILY_API_KEY").unwrap().expose_secret(), "tvly-new");
    }

    #[test]
    fn chain_prefers_earlier_sources() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let chain = SecretsChain::new()
            .with_source(SecretsFile::new(write_secrets(
                &first,
                "OPENAI_API_KEY = \"sk-first\"\n",
            )))
            .with_source(SecretsFile::new(write_secrets(
                &second,
                "OPENAI_API_KEY = \"sk-second\"\nTAVILY_API_KEY = \"tvly-second\"\n",
            )));

        let (openai, _) = chain.find("OPENAI_API_KEY").unwrap();
        let (tavily, source) = chain.find("TAVILY_API_KEY").unwrap();
        assert_eq!(openai.expose_secret(), "sk-first");
        assert_eq!(tavily.expose_secret(), "tvly-second");
        assert_eq!(source, CredentialSource::SecretsFile);
    }

    #[test]
    fn empty_chain_finds_nothing() {
        let chain = SecretsChain::new();
        assert!(chain.is_empty());
        assert!(chain.find("OPENAI_API_KEY").is_none());
    }
}
