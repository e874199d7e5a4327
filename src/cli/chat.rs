//! Interactive chat REPL.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::commands::{self, ReplCommand};
use super::prompt::TerminalPrompt;
use super::{INPUT_PROMPT, MISSING_KEYS_HINT, THINKING_MESSAGE, TITLE};
use crate::agent::{AgentFactory, OpenAiAgentFactory};
use crate::config::ScoutConfig;
use crate::conversation::{ChatMessage, ChatRole, ChatSession, LoopState, TurnOutcome};
use crate::credentials::{resolve, ResolvedCredentials, SecretsChain};
use crate::error::Result;

pub async fn run_chat(config: ScoutConfig) -> Result<ExitCode> {
    println!("\n  {}\n", style(TITLE).green().bold());

    let mut prompt = TerminalPrompt::new();
    let credentials = resolve(&SecretsChain::standard(&config), &mut prompt);
    print_missing_hint(&credentials);

    let agents: Arc<dyn AgentFactory> = Arc::new(OpenAiAgentFactory::new(config.clone()));
    let mut session = ChatSession::new(&config, credentials, agents);
    debug!(session = %session.id(), "chat started");

    println!();
    for message in session.transcript().messages() {
        print_message(message);
    }
    session.await_input();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  {} ", style(INPUT_PROMPT).green());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!("\n  {}", style("Session ended.").dim());
            break;
        };

        if let Some(command) = commands::parse(&line) {
            match command {
                ReplCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ReplCommand::Refresh => {
                    let credentials = resolve(&SecretsChain::standard(&config), &mut prompt);
                    print_missing_hint(&credentials);
                    session.refresh_credentials(credentials);
                }
                ReplCommand::Help => println!("\n{}\n", commands::help_text()),
                ReplCommand::Unknown(name) => println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let mut spinner: Option<ProgressBar> = None;
        let outcome = session
            .submit_with(&line, |state| match state {
                LoopState::Processing => spinner = Some(thinking_spinner()),
                _ => {
                    if let Some(spinner) = spinner.take() {
                        spinner.finish_and_clear();
                    }
                }
            })
            .await;

        match &outcome {
            TurnOutcome::Ignored => {}
            TurnOutcome::Replied { .. } => {
                if let Some(reply) = session.transcript().last() {
                    print_message(reply);
                }
            }
            TurnOutcome::MissingCredentials { message } | TurnOutcome::Failed { message, .. } => {
                eprintln!("\n  {}\n", style(message).red());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(THINKING_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_message(message: &ChatMessage) {
    let label = match message.role() {
        ChatRole::User => style("You").green().bold(),
        ChatRole::Assistant => style("Advisor").cyan().bold(),
    };
    println!("  {label}  {}\n", message.content());
}

pub(crate) fn print_missing_hint(credentials: &ResolvedCredentials) {
    if !credentials.pair.is_complete() {
        eprintln!("  {}", style(MISSING_KEYS_HINT).yellow());
    }
}
