//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::DEFAULT_OPENAI_BASE_URL;
use crate::error::ScoutError;
use crate::types::*;

use super::http::{bearer_headers, ensure_success};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub struct OpenAiProvider {
    client: reqwest::Client,
    model: String,
    api_key: SecretString,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(
        client: reqwest::Client,
        model: impl Into<String>,
        api_key: SecretString,
        base_url: Option<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    pub(crate) fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let messages = request
            .messages
            .iter()
            .flat_map(message_to_openai)
            .collect::<Vec<_>>();

        let mut body = serde_json::Map::new();
        body.insert("model".into(), self.model.clone().into());
        body.insert("messages".into(), messages.into());
        body.insert("stream".into(), false.into());

        if let Some(temp) = request.settings.temperature {
            body.insert("temperature".into(), temp.into());
        }
        if let Some(max) = request.settings.max_tokens {
            body.insert("max_tokens".into(), max.into());
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                body.insert("tools".into(), tool_defs.into());
            }
        }

        Value::Object(body)
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, ScoutError> {
        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %self.model, messages = request.messages.len(), "OpenAI generate_text");

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(self.api_key.expose_secret()))
            .json(&body)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let raw = resp.text().await?;
        let data: OpenAiChatResponse = serde_json::from_str(&raw)?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScoutError::api(200, "No choices in OpenAI response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(Value::String(tc.function.arguments)),
            })
            .collect();

        Ok(ProviderResponse {
            text: choice.message.content.unwrap_or_default(),
            usage: data
                .usage
                .map(|u| Usage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                })
                .unwrap_or_default(),
            tool_calls,
            finish_reason: choice.finish_reason.as_deref().and_then(|r| r.parse().ok()),
        })
    }
}

/// One model message can expand into several wire messages: each tool
/// result travels as its own `tool` message.
fn message_to_openai(msg: &ModelMessage) -> Vec<Value> {
    let role = msg.role.to_string();

    let results: Vec<Value> = msg
        .content
        .iter()
        .filter_map(|part| match part {
            ContentPart::ToolResult(tr) => Some(json!({
                "role": "tool",
                "tool_call_id": tr.tool_call_id,
                "content": tool_result_content(&tr.result),
            })),
            _ => None,
        })
        .collect();
    if !results.is_empty() {
        return results;
    }

    let calls = msg.tool_calls();
    if !calls.is_empty() {
        let tc_json: Vec<Value> = calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": tc.arguments.to_string(),
                    }
                })
            })
            .collect();
        let text = msg.text_content();
        return vec![json!({
            "role": role,
            "content": if text.is_empty() { Value::Null } else { Value::String(text) },
            "tool_calls": tc_json,
        })];
    }

    vec![json!({ "role": role, "content": msg.text_content() })]
}

fn tool_result_content(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ToolDefinition;
    use pretty_assertions::assert_eq;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(
            reqwest::Client::new(),
            "gpt-4o",
            SecretString::from("sk-test"),
            Some("http://localhost:9999/v1/".into()),
        )
    }

    #[test]
    fn body_carries_model_temperature_and_tools() {
        let request = ProviderRequest {
            messages: vec![ModelMessage::system("sys"), ModelMessage::user("hi")],
            settings: GenerationSettings::builder().temperature(0.0).build(),
            tools: Some(vec![ToolDefinition {
                name: "tavily_search_results_json".into(),
                description: "search".into(),
                parameters: json!({"type": "object"}),
            }]),
        };

        let body = provider().build_request_body(&request);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "hi"},
            ])
        );
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "tavily_search_results_json");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn empty_tool_list_is_omitted() {
        let request = ProviderRequest {
            messages: vec![ModelMessage::user("hi")],
            settings: GenerationSettings::default(),
            tools: Some(vec![]),
        };
        let body = provider().build_request_body(&request);
        assert!(body.get("tools").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn tool_round_trip_messages_use_wire_shapes() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "tavily_search_results_json".into(),
            arguments: json!({"query": "碳權"}),
        };
        let assistant = ModelMessage::assistant_tool_calls("", std::slice::from_ref(&call));
        let tool = ModelMessage::tool_result(ToolResult {
            tool_call_id: "call_1".into(),
            result: json!([{"url": "https://example.com", "content": "x"}]),
            is_error: false,
        });

        let wire_assistant = message_to_openai(&assistant);
        let wire_tool = message_to_openai(&tool);

        assert_eq!(wire_assistant[0]["content"], Value::Null);
        assert_eq!(wire_assistant[0]["tool_calls"][0]["id"], "call_1");
        assert_eq!(
            wire_assistant[0]["tool_calls"][0]["function"]["arguments"],
            r#"{"query":"碳權"}"#
        );
        assert_eq!(wire_tool[0]["role"], "tool");
        assert_eq!(wire_tool[0]["tool_call_id"], "call_1");
        assert_eq!(
            wire_tool[0]["content"],
            r#"[{"content":"x","url":"https://example.com"}]"#
        );
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        assert_eq!(provider().base_url, "http://localhost:9999/v1");
    }
}
