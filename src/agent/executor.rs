//! Tool-calling executor.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{Agent, AgentInput, AgentOutput, AgentStep};
use crate::config::ScoutConfig;
use crate::credentials::ApiKeys;
use crate::error::{AgentError, ScoutError};
use crate::provider::{http, ModelProvider, OpenAiProvider, ProviderRequest, ToolDefinition};
use crate::tools::{TavilySearchTool, Tool, ToolArguments};
use crate::types::*;

/// Output returned when the model is still calling tools at the iteration cap.
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit or time limit.";

/// Calls the model, runs any tools it asks for, feeds the results back, and
/// repeats until the model answers in plain text.
pub struct ToolCallingAgent {
    provider: Box<dyn ModelProvider>,
    tools: Vec<Box<dyn Tool>>,
    settings: GenerationSettings,
    max_iterations: usize,
}

impl ToolCallingAgent {
    pub fn new(provider: Box<dyn ModelProvider>) -> Self {
        Self {
            provider,
            tools: Vec::new(),
            settings: GenerationSettings::default(),
            max_iterations: ScoutConfig::default().max_iterations,
        }
    }

    /// OpenAI model plus Tavily search, sharing one HTTP client.
    pub fn from_config(config: &ScoutConfig, keys: &ApiKeys) -> Result<Self, ScoutError> {
        let client = http::build_client(config.request_timeout())?;
        let provider = OpenAiProvider::new(
            client.clone(),
            config.model.clone(),
            keys.language_model.clone(),
            Some(config.openai_base_url.clone()),
        );
        let search = TavilySearchTool::new(
            client,
            keys.search.clone(),
            Some(config.tavily_base_url.clone()),
        )
        .with_max_results(config.search_max_results)
        .with_search_depth(config.search_depth);

        Ok(Self::new(Box::new(provider))
            .with_tool(Box::new(search))
            .with_settings(
                GenerationSettings::builder()
                    .temperature(config.temperature)
                    .build(),
            )
            .with_max_iterations(config.max_iterations))
    }

    pub fn with_tool(mut self, tool: Box<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.iter().map(|t| t.definition()).collect())
        }
    }

    /// Tool failures become error results for the model to read; they never
    /// abort the run.
    async fn run_tool(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.tools.iter().find(|t| t.name() == call.name) else {
            warn!(tool = %call.name, "Tool not found");
            return ToolResult {
                tool_call_id: call.id.clone(),
                result: serde_json::json!({"error": format!("Tool '{}' not found", call.name)}),
                is_error: true,
            };
        };

        info!(tool = %call.name, arguments = %call.arguments, "invoking tool");
        let args = ToolArguments::new(call.arguments.clone());
        match tool.execute(&args).await {
            Ok(result) => {
                debug!(tool = %call.name, %result, "tool returned");
                ToolResult {
                    tool_call_id: call.id.clone(),
                    result,
                    is_error: false,
                }
            }
            Err(e) => {
                let failure = ScoutError::ToolExecution {
                    tool_name: call.name.clone(),
                    message: e.to_string(),
                };
                warn!(category = ?failure.category(), error = %failure, "Tool execution failed");
                ToolResult {
                    tool_call_id: call.id.clone(),
                    result: serde_json::json!({"error": failure.to_string()}),
                    is_error: true,
                }
            }
        }
    }
}

#[async_trait]
impl Agent for ToolCallingAgent {
    async fn invoke(&self, input: AgentInput) -> Result<AgentOutput, AgentError> {
        let tools = self.tool_definitions();
        let AgentInput {
            system,
            input,
            mut scratchpad,
        } = input;

        let mut steps = Vec::new();
        let mut usage = Usage::default();

        for iteration in 0..self.max_iterations {
            let mut messages = Vec::with_capacity(scratchpad.len() + 2);
            messages.push(ModelMessage::system(system.clone()));
            messages.push(ModelMessage::user(input.clone()));
            messages.extend(scratchpad.iter().cloned());

            let request = ProviderRequest {
                messages,
                settings: self.settings.clone(),
                tools: tools.clone(),
            };

            debug!(
                iteration,
                model = self.provider.model_id(),
                "calling provider"
            );
            let response = self.provider.generate_text(&request).await?;
            usage.merge(&response.usage);

            if response.tool_calls.is_empty() {
                info!(iteration, steps = steps.len(), "agent finished");
                return Ok(AgentOutput {
                    output: response.text,
                    steps,
                    usage,
                });
            }

            scratchpad.push(ModelMessage::assistant_tool_calls(
                &response.text,
                &response.tool_calls,
            ));
            for call in &response.tool_calls {
                let observation = self.run_tool(call).await;
                scratchpad.push(ModelMessage::tool_result(observation.clone()));
                steps.push(AgentStep {
                    call: call.clone(),
                    observation,
                });
            }
        }

        warn!(max_iterations = self.max_iterations, "agent stopped at iteration limit");
        Ok(AgentOutput {
            output: ITERATION_LIMIT_MESSAGE.to_string(),
            steps,
            usage,
        })
    }
}
