//! `carbon-scout keys`: where each API key would come from.

use std::process::ExitCode;

use console::style;

use super::chat::print_missing_hint;
use crate::config::ScoutConfig;
use crate::credentials::{mask_secret, resolve, CredentialKey, NoPrompt, SecretsChain};

pub fn run_keys(config: &ScoutConfig) -> ExitCode {
    let resolved = resolve(&SecretsChain::standard(config), &mut NoPrompt);

    println!();
    for key in CredentialKey::ALL {
        match (resolved.pair.get(key), resolved.source(key)) {
            (Some(secret), Some(source)) => println!(
                "  {} {:<16} {} ({})",
                style("✓").green().bold(),
                key.name(),
                mask_secret(secret),
                style(source).dim()
            ),
            _ => println!(
                "  {} {:<16} {}",
                style("✗").red().bold(),
                key.name(),
                style("not set").dim()
            ),
        }
    }
    println!();
    print_missing_hint(&resolved);

    ExitCode::SUCCESS
}
