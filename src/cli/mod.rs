//! Command-line shell for the carbon-credit assistant.

pub mod ask;
pub mod chat;
pub mod commands;
pub mod keys;
pub mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::config::ScoutConfig;
use crate::error::Result;

pub const TITLE: &str = "🌿 碳權與碳匯智慧搜尋引擎";
pub const SETTINGS_HEADER: &str = "⚙️ 開發者設定";
pub const MISSING_KEYS_HINT: &str = "💡 請輸入 Key 以開始測試";
pub const INPUT_PROMPT: &str = "請輸入問題...";
pub const THINKING_MESSAGE: &str = "🔍 搜尋與思考中...";

/// Carbon-credit research assistant
#[derive(Parser, Debug)]
#[command(
    name = "carbon-scout",
    version,
    about = "Carbon-credit and carbon-sink research assistant with web search"
)]
pub struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Secrets file holding OPENAI_API_KEY / TAVILY_API_KEY
    #[arg(long, global = true)]
    pub secrets: Option<PathBuf>,

    /// Chat model id
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(short, long, global = true)]
    pub temperature: Option<f64>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Ask one question and print the answer
    Ask(AskArgs),
    /// Show which API keys are available and where they come from
    Keys,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question
    pub question: String,
}

impl Cli {
    /// Config file and environment, then command-line overrides.
    pub fn load_config(&self) -> Result<ScoutConfig> {
        let mut config = ScoutConfig::load(self.config.as_deref())?;
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(secrets) = &self.secrets {
            config.secrets_path = Some(secrets.clone());
        }
        Ok(config)
    }
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,carbon_scout=info",
        _ => "info,carbon_scout=debug",
    }
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.load_config()?;
    match cli.command {
        None | Some(Commands::Chat) => chat::run_chat(config).await,
        Some(Commands::Ask(args)) => ask::run_ask(config, &args.question).await,
        Some(Commands::Keys) => Ok(keys::run_keys(&config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_without_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["carbon-scout"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(cli.model.is_none());
    }

    #[test]
    fn parse_ask_with_global_options() {
        let cli = Cli::try_parse_from([
            "carbon-scout",
            "ask",
            "什麼是碳匯？",
            "--model",
            "gpt-4o-mini",
            "-t",
            "0.3",
            "-vv",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Ask(args)) => assert_eq!(args.question, "什麼是碳匯？"),
            other => panic!("expected Ask, got {other:?}"),
        }
        assert_eq!(cli.model.as_deref(), Some("gpt-4o-mini"));
        assert!((cli.temperature.unwrap() - 0.3).abs() < f64::EPSILON);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn parse_keys_with_secrets_path() {
        let cli = Cli::try_parse_from(["carbon-scout", "--secrets", "/tmp/s.toml", "keys"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Keys)));
        assert_eq!(cli.secrets, Some(PathBuf::from("/tmp/s.toml")));
    }

    #[test]
    fn parse_ask_missing_question_is_error() {
        assert!(Cli::try_parse_from(["carbon-scout", "ask"]).is_err());
    }

    #[test]
    fn verbosity_raises_crate_level_first() {
        assert_eq!(default_log_filter(0), "warn");
        assert!(default_log_filter(1).contains("carbon_scout=info"));
        assert!(default_log_filter(5).contains("carbon_scout=debug"));
    }
}
