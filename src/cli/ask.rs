//! One-shot question.

use std::process::ExitCode;
use std::sync::Arc;

use console::style;

use crate::agent::{AgentFactory, OpenAiAgentFactory};
use crate::config::ScoutConfig;
use crate::conversation::{ChatSession, TurnOutcome};
use crate::credentials::{resolve, NoPrompt, SecretsChain};
use crate::error::Result;

/// Never prompts; missing keys fail the run.
pub async fn run_ask(config: ScoutConfig, question: &str) -> Result<ExitCode> {
    let credentials = resolve(&SecretsChain::standard(&config), &mut NoPrompt);
    let agents: Arc<dyn AgentFactory> = Arc::new(OpenAiAgentFactory::new(config.clone()));
    let mut session = ChatSession::new(&config, credentials, agents);

    match session.submit(question).await {
        TurnOutcome::Replied { text } => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        TurnOutcome::Ignored => {
            eprintln!("{}", style("The question is empty.").red());
            Ok(ExitCode::FAILURE)
        }
        TurnOutcome::MissingCredentials { message } | TurnOutcome::Failed { message, .. } => {
            eprintln!("{}", style(message).red());
            Ok(ExitCode::FAILURE)
        }
    }
}
