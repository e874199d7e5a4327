//! Shared test helpers: a scripted agent factory and env guards.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use async_trait::async_trait;
use secrecy::ExposeSecret;

use carbon_scout::agent::{Agent, AgentFactory, AgentInput, AgentOutput};
use carbon_scout::credentials::ApiKeys;
use carbon_scout::error::AgentError;
use carbon_scout::types::Usage;

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<String, AgentError>>,
    inputs: Vec<AgentInput>,
    keys: Vec<(String, String)>,
    hang_when_drained: bool,
}

/// Factory whose agents replay queued replies and record what they saw.
#[derive(Clone, Default)]
pub struct ScriptedAgents {
    script: Arc<Mutex<Script>>,
}

impl ScriptedAgents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_reply(&self, text: &str) -> &Self {
        self.lock().replies.push_back(Ok(text.to_string()));
        self
    }

    pub fn queue_error(&self, error: AgentError) -> &Self {
        self.lock().replies.push_back(Err(error));
        self
    }

    /// Once the queue is empty, `invoke` never completes.
    pub fn hang_when_drained(&self) -> &Self {
        self.lock().hang_when_drained = true;
        self
    }

    /// Inputs passed to `invoke`, in call order.
    pub fn inputs(&self) -> Vec<AgentInput> {
        self.lock().inputs.clone()
    }

    /// `(language_model, search)` keys each agent was built with.
    pub fn keys_seen(&self) -> Vec<(String, String)> {
        self.lock().keys.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }
}

impl AgentFactory for ScriptedAgents {
    fn build(&self, keys: &ApiKeys) -> Result<Box<dyn Agent>, AgentError> {
        self.lock().keys.push((
            keys.language_model.expose_secret().to_string(),
            keys.search.expose_secret().to_string(),
        ));
        Ok(Box::new(ScriptedAgent {
            script: self.script.clone(),
        }))
    }
}

struct ScriptedAgent {
    script: Arc<Mutex<Script>>,
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn invoke(&self, input: AgentInput) -> Result<AgentOutput, AgentError> {
        let next = {
            let mut script = self.script.lock().unwrap();
            script.inputs.push(input);
            match script.replies.pop_front() {
                Some(reply) => Some(reply),
                None if script.hang_when_drained => None,
                None => Some(Ok("(no scripted reply)".to_string())),
            }
        };
        let Some(reply) = next else {
            return std::future::pending().await;
        };
        Ok(AgentOutput {
            output: reply?,
            steps: Vec::new(),
            usage: Usage::default(),
        })
    }
}

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Serializes tests that touch the process environment.
pub fn env_lock_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restores the captured variables on drop.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

pub const CREDENTIAL_VARS: [&str; 2] = ["OPENAI_API_KEY", "TAVILY_API_KEY"];
