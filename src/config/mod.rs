//! Configuration system (layered: defaults < config file < env < CLI flags).
//!
//! API keys are deliberately not part of [`ScoutConfig`]; they are resolved
//! by [`crate::credentials`] and injected into the clients that need them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};
use crate::tools::search::SearchDepth;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "你是一位碳權專家，請用繁體中文回答。";
pub const DEFAULT_GREETING: &str = "您好！我是您的碳權顧問。請問想了解什麼？";

const CONFIG_FILE_NAME: &str = "carbon-scout.toml";

/// Runtime configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub model: String,
    pub temperature: f64,
    pub openai_base_url: String,
    pub tavily_base_url: String,
    pub search_max_results: u32,
    pub search_depth: SearchDepth,
    /// Upper bound on model calls per submission.
    pub max_iterations: usize,
    pub request_timeout_secs: u64,
    pub system_instruction: String,
    pub greeting: String,
    /// Secrets file consulted before the environment.
    pub secrets_path: Option<PathBuf>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            tavily_base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            search_max_results: 5,
            search_depth: SearchDepth::Advanced,
            max_iterations: 15,
            request_timeout_secs: 120,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            secrets_path: None,
        }
    }
}

impl ScoutConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the first existing file
    /// among `./carbon-scout.toml` and `~/.carbon-scout/config.toml` is used,
    /// falling back to defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match discover_config_file() {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ScoutError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
            .map_err(|e| ScoutError::Configuration(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply `CARBON_SCOUT_*` and base URL environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(model) = std::env::var("CARBON_SCOUT_MODEL") {
            self.model = model;
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            self.openai_base_url = url;
        }
        if let Ok(url) = std::env::var("TAVILY_BASE_URL") {
            self.tavily_base_url = url;
        }
        if let Ok(path) = std::env::var("CARBON_SCOUT_SECRETS") {
            self.secrets_path = Some(PathBuf::from(path));
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `~/.carbon-scout`, or `./.carbon-scout` when no home directory is known.
pub fn default_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".carbon-scout"))
        .unwrap_or_else(|| PathBuf::from(".carbon-scout"))
}

fn discover_config_file() -> Option<PathBuf> {
    [PathBuf::from(CONFIG_FILE_NAME), default_dir().join("config.toml")]
        .into_iter()
        .find(|candidate| candidate.is_file())
}
