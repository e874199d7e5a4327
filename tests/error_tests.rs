//! Failure classification as seen by the conversation loop.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use carbon_scout::agent::{Agent, AgentInput, ToolCallingAgent};
use carbon_scout::conversation::failure_message;
use carbon_scout::error::{AgentError, AgentErrorKind, ErrorCategory, ScoutError};
use carbon_scout::provider::{http, OpenAiProvider};

#[tokio::test]
async fn slow_backend_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = http::build_client(Duration::from_millis(50)).unwrap();
    let provider = OpenAiProvider::new(
        client,
        "gpt-4o",
        SecretString::from("sk-test"),
        Some(server.uri()),
    );
    let agent = ToolCallingAgent::new(Box::new(provider));

    let err = agent.invoke(AgentInput::new("s", "q")).await.unwrap_err();

    assert_eq!(err.kind, AgentErrorKind::Network);
    assert!(err.message.starts_with("Network error"));
    assert_eq!(failure_message(&err), format!("發生錯誤：{}", err.message));
}

#[test]
fn tool_execution_errors_are_unknown_to_the_loop() {
    let err = ScoutError::ToolExecution {
        tool_name: "tavily_search_results_json".into(),
        message: "bad response".into(),
    };
    assert_eq!(err.category(), ErrorCategory::ToolExecution);
    assert_eq!(AgentError::from(err).kind, AgentErrorKind::Unknown);
}

#[test]
fn authentication_is_never_retryable() {
    let err = AgentError::from(ScoutError::Authentication("bad key".into()));
    assert_eq!(err.kind, AgentErrorKind::Authentication);
    assert!(!err.is_retryable());
    assert_eq!(err.to_string(), "Authentication error: bad key");
}
