//! Slash commands understood by the chat REPL.

/// A line that starts with `/`.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Re-resolve credentials.
    Refresh,
    Exit,
    Help,
    Unknown(String),
}

/// `None` when the line is a question rather than a command.
pub fn parse(line: &str) -> Option<ReplCommand> {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    let name = trimmed.split_whitespace().next().unwrap_or(trimmed).to_lowercase();
    Some(match name.as_str() {
        "/refresh" => ReplCommand::Refresh,
        "/exit" | "/quit" | "/q" => ReplCommand::Exit,
        "/help" | "/?" => ReplCommand::Help,
        _ => ReplCommand::Unknown(name),
    })
}

pub fn help_text() -> &'static str {
    "/refresh  re-read API keys (prompts for missing ones)\n\
     /exit     quit (Ctrl-D also works)\n\
     /help     this list"
}
