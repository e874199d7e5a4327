//! Message types exchanged with the model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A message in a model request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ModelMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text(Role::User, text)
    }

    /// Assistant turn that requested tool calls, with any text it produced alongside.
    pub fn assistant_tool_calls(text: &str, calls: &[ToolCall]) -> Self {
        let mut content = Vec::with_capacity(calls.len() + 1);
        if !text.is_empty() {
            content.push(ContentPart::Text {
                text: text.to_string(),
            });
        }
        content.extend(calls.iter().cloned().map(ContentPart::ToolCall));
        Self {
            role: Role::Assistant,
            content,
        }
    }

    pub fn tool_result(result: ToolResult) -> Self {
        Self {
            role: Role::Tool,
            content: vec![ContentPart::ToolResult(result)],
        }
    }

    fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }

    /// Concatenated text parts.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::ToolCall(tc) => Some(tc),
                _ => None,
            })
            .collect()
    }
}

/// Conversation role on the wire.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single part of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ToolCall(ToolCall),
    ToolResult(ToolResult),
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// The outcome of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub result: serde_json::Value,
    #[serde(default)]
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assistant_tool_calls_skips_empty_text() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "tavily_search_results_json".into(),
            arguments: json!({"query": "carbon credit"}),
        };
        let msg = ModelMessage::assistant_tool_calls("", std::slice::from_ref(&call));
        assert_eq!(msg.content.len(), 1);
        assert_eq!(msg.tool_calls(), vec![&call]);
        assert_eq!(msg.text_content(), "");
    }

    #[test]
    fn assistant_tool_calls_keeps_text_first() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "search".into(),
            arguments: json!({}),
        };
        let msg = ModelMessage::assistant_tool_calls("let me look", &[call]);
        assert!(matches!(&msg.content[0], ContentPart::Text { text } if text == "let me look"));
        assert_eq!(msg.text_content(), "let me look");
    }

    #[test]
    fn role_displays_lowercase() {
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!("tool".parse::<Role>().unwrap(), Role::Tool);
    }
}
