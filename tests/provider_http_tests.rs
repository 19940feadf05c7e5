//! Provider HTTP Tests
//!
//! Wire-format checks for the OpenAI-compatible and Anthropic adapters
//! against a local mock server, including a budget-tracked round trip.
//!
//! Run: cargo nextest run --test provider_http_tests

use std::sync::Arc;

use llm_orchestrator::budget::{BudgetTracker, CallOrigin, ExecutionGuard, PricingTable};
use llm_orchestrator::client::{
    AnthropicProvider, ChatProvider, ChatRequest, OpenAiCompatibleProvider,
};
use llm_orchestrator::{Error, Message, ToolDefinition, Usage};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// OpenAI-compatible
// =============================================================================

mod openai {
    use super::*;

    fn completion(content: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-2024-08-06",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 1000, "completion_tokens": 500, "total_tokens": 1500}
        })
    }

    #[tokio::test]
    async fn test_complete_sends_bearer_and_parses_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o",
                "max_tokens": 64,
                "messages": [
                    {"role": "system", "content": "be terse"},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("hello"))))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("openai", format!("{}/v1", server.uri()))
            .unwrap()
            .with_api_key("sk-test");
        let response = provider
            .complete(
                ChatRequest::prompt("gpt-4o", "hi")
                    .with_system("be terse")
                    .with_max_tokens(64),
            )
            .await
            .unwrap();

        assert_eq!(response.content, "hello");
        assert_eq!(response.usage, Some(Usage::new(1000, 500)));
    }

    #[tokio::test]
    async fn test_tools_and_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "tools": [{"type": "function", "function": {"name": "search"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "search", "arguments": "{\"prompt\":\"rust\"}"}
                    }]
                }}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("local", server.uri()).unwrap();
        let request = ChatRequest::new("llama-3", vec![Message::user("find")]).with_tools(vec![
            ToolDefinition::new("search", "Search", json!({"type": "object"})),
        ]);
        let response = provider.complete(request).await.unwrap();

        assert!(response.wants_tool_use());
        assert_eq!(response.tool_calls[0].id, "call_9");
        assert_eq!(response.tool_calls[0].parse_arguments().unwrap()["prompt"], "rust");
        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn test_error_envelope_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("openai", server.uri())
            .unwrap()
            .with_api_key("bad");
        let err = provider
            .complete(ChatRequest::prompt("gpt-4o", "hi"))
            .await
            .unwrap_err();

        match err {
            Error::Api {
                message,
                status,
                error_type,
            } => {
                assert_eq!(message, "Incorrect API key provided");
                assert_eq!(status, Some(401));
                assert_eq!(error_type.as_deref(), Some("invalid_request_error"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("openai", server.uri()).unwrap();
        let err = provider
            .complete(ChatRequest::prompt("gpt-4o", "hi"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn test_tracked_round_trip_records_cost() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("done"))))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("openai", server.uri()).unwrap();
        let mut tracker =
            BudgetTracker::new(100, Arc::new(PricingTable::builder().with_defaults().build()));
        let origin = CallOrigin::tool("analyze");

        let guarded = ExecutionGuard::new(&provider, &origin)
            .run(ChatRequest::prompt("gpt-4", "hi"), Some(&mut tracker))
            .await
            .unwrap();

        let summary = guarded.cost_tracker.unwrap();
        assert_eq!(summary.total_cost_cents, 6);
        assert_eq!(summary.tool_queries, 1);

        let body = &server.received_requests().await.unwrap()[0];
        let sent: serde_json::Value = serde_json::from_slice(&body.body).unwrap();
        assert_eq!(sent["max_tokens"], 4096);
    }
}

// =============================================================================
// Anthropic
// =============================================================================

mod anthropic {
    use super::*;

    #[tokio::test]
    async fn test_messages_headers_and_content_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-haiku-4-5",
                "max_tokens": 4096,
                "system": "route"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "model": "claude-haiku-4-5",
                "content": [
                    {"type": "text", "text": "Checking. "},
                    {"type": "tool_use", "id": "tu_1", "name": "search", "input": {"prompt": "q"}},
                    {"type": "text", "text": "Done."}
                ],
                "stop_reason": "tool_use",
                "usage": {"input_tokens": 42, "output_tokens": 17}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("sk-ant-test")
            .unwrap()
            .with_base_url(server.uri());
        let response = provider
            .complete(ChatRequest::prompt("claude-haiku-4-5", "hi").with_system("route"))
            .await
            .unwrap();

        assert_eq!(response.content, "Checking. Done.");
        assert_eq!(response.tool_calls[0].name, "search");
        assert_eq!(response.usage, Some(Usage::new(42, 17)));
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_json(json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("k").unwrap().with_base_url(server.uri());
        let err = provider
            .complete(ChatRequest::prompt("claude-sonnet-4-5", "hi"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(529));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Overloaded"));
    }
}
