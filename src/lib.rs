//! carbon-scout: a carbon-credit research assistant.
//!
//! Answers questions about carbon credits and carbon sinks in Traditional
//! Chinese, using an OpenAI chat model that can call Tavily web search.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use carbon_scout::prelude::*;
//!
//! # async fn example() -> carbon_scout::error::Result<()> {
//! let config = ScoutConfig::load(None)?;
//! let credentials = resolve(&SecretsChain::standard(&config), &mut NoPrompt);
//! let agents = Arc::new(OpenAiAgentFactory::new(config.clone()));
//! let mut session = ChatSession::new(&config, credentials, agents);
//!
//! if let TurnOutcome::Replied { text } = session.submit("什麼是碳匯？").await {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod conversation;
pub mod credentials;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
