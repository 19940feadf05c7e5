//! Anthropic Messages API adapter.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};

use super::base::{RequestExecutor, default_http_client};
use super::{ChatProvider, ChatRequest};
use crate::types::{ChatResponse, Role, ToolCall, Usage};
use crate::{Error, Result};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// The Messages API requires `max_tokens`; used when the request leaves it unset.
const FALLBACK_MAX_TOKENS: u64 = 4096;

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    base_url: String,
    api_key: SecretString,
    api_version: String,
    http: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_key: SecretString::from(api_key.into()),
            api_version: ANTHROPIC_API_VERSION.to_string(),
            http: default_http_client()?,
        })
    }

    pub fn from_env() -> Result<Self> {
        let key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| Error::Config("ANTHROPIC_API_KEY is not set".into()))?;
        Self::new(key)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                json!({"role": role, "content": m.content})
            })
            .collect();

        let mut body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
            "messages": messages,
        });

        if let Some(system) = &request.system {
            body["system"] = json!(system);
        }
        if !request.tools.is_empty() {
            body["tools"] = serde_json::to_value(&request.tools).unwrap_or(Value::Null);
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }

    fn parse_response(&self, requested_model: &str, value: Value) -> Result<ChatResponse> {
        let message: MessagesResponse =
            serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();
        for block in message.content {
            match block {
                Block::Text { text } => content.push_str(&text),
                Block::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall::new(id, name, input.to_string()));
                }
                Block::Other => {}
            }
        }

        Ok(ChatResponse {
            model: message
                .model
                .unwrap_or_else(|| requested_model.to_string()),
            content,
            tool_calls,
            usage: message
                .usage
                .map(|u| Usage::new(u.input_tokens, u.output_tokens)),
        })
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_body(&request);

        let req = self
            .http
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", &self.api_version);

        let value = RequestExecutor::post_json(req, &body).await?;
        self.parse_response(&request.model, value)
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    content: Vec<Block>,
    #[serde(default)]
    usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Block {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new("sk-ant-test").unwrap()
    }

    #[test]
    fn test_build_body_defaults_max_tokens() {
        let request = ChatRequest::new("claude-sonnet-4-5", vec![Message::user("hi")]);
        let body = provider().build_body(&request);
        assert_eq!(body["max_tokens"], FALLBACK_MAX_TOKENS);
        assert!(body.get("system").is_none());
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_mixed_content() {
        let value = json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-5",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Let me check."},
                {"type": "tool_use", "id": "tu_1", "name": "search", "input": {"prompt": "q"}}
            ],
            "usage": {"input_tokens": 30, "output_tokens": 12}
        });

        let response = provider().parse_response("claude-sonnet-4-5", value).unwrap();
        assert_eq!(response.content, "Let me check.");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(
            response.tool_calls[0].parse_arguments().unwrap()["prompt"],
            "q"
        );
        assert_eq!(response.usage, Some(Usage::new(30, 12)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains("sk-ant-test"));
    }
}
