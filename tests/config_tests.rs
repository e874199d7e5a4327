//! Configuration layering: file, then environment.

mod common;

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use carbon_scout::config::ScoutConfig;
use carbon_scout::error::ScoutError;
use carbon_scout::tools::SearchDepth;

use common::{env_lock_guard, EnvGuard};

const CONFIG_ENV_VARS: [&str; 4] = [
    "CARBON_SCOUT_MODEL",
    "OPENAI_BASE_URL",
    "TAVILY_BASE_URL",
    "CARBON_SCOUT_SECRETS",
];

fn clear_env() -> EnvGuard {
    let guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for var in CONFIG_ENV_VARS {
        std::env::remove_var(var);
    }
    guard
}

#[test]
fn explicit_file_is_loaded() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("carbon-scout.toml");
    std::fs::write(
        &path,
        "model = \"gpt-4o-mini\"\nmax_iterations = 4\nsearch_depth = \"basic\"\n",
    )
    .unwrap();

    let config = ScoutConfig::load(Some(&path)).unwrap();

    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.max_iterations, 4);
    assert_eq!(config.search_depth, SearchDepth::Basic);
    assert_eq!(config.search_max_results, 5);
}

#[test]
fn environment_overrides_file() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    std::env::set_var("CARBON_SCOUT_MODEL", "gpt-4.1");
    std::env::set_var("OPENAI_BASE_URL", "http://localhost:9999/v1");
    std::env::set_var("TAVILY_BASE_URL", "http://localhost:9998");
    std::env::set_var("CARBON_SCOUT_SECRETS", "/etc/carbon/secrets.toml");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("carbon-scout.toml");
    std::fs::write(&path, "model = \"gpt-4o-mini\"\n").unwrap();

    let config = ScoutConfig::load(Some(&path)).unwrap();

    assert_eq!(config.model, "gpt-4.1");
    assert_eq!(config.openai_base_url, "http://localhost:9999/v1");
    assert_eq!(config.tavily_base_url, "http://localhost:9998");
    assert_eq!(
        config.secrets_path,
        Some(PathBuf::from("/etc/carbon/secrets.toml"))
    );
}

#[test]
fn malformed_file_is_a_configuration_error() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("carbon-scout.toml");
    std::fs::write(&path, "max_iterations = \"many\"\n").unwrap();

    let err = ScoutConfig::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ScoutError::Configuration(ref msg) if msg.contains("carbon-scout.toml")));
}

#[test]
fn config_round_trips_through_toml() {
    let config = ScoutConfig {
        model: "gpt-4o-mini".into(),
        temperature: 0.2,
        secrets_path: Some(PathBuf::from("/tmp/carbon-secrets.toml")),
        ..Default::default()
    };
    let raw = toml::to_string(&config).unwrap();
    assert_eq!(ScoutConfig::from_toml(&raw).unwrap(), config);
}
