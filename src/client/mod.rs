//! Provider-agnostic chat clients.
//!
//! Every LLM backend implements [`ChatProvider`]; the rest of the crate only
//! sees normalized [`ChatRequest`] / [`ChatResponse`] values.

mod anthropic;
mod base;
mod openai;
mod registry;
mod request;

pub use anthropic::{ANTHROPIC_API_VERSION, ANTHROPIC_BASE_URL, AnthropicProvider};
pub use openai::{OPENAI_BASE_URL, OPENROUTER_BASE_URL, OpenAiCompatibleProvider};
pub use registry::ProviderRegistry;
pub use request::ChatRequest;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::Result;
use crate::types::ChatResponse;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A chat-completion backend capable of function calling.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    fn name(&self) -> &str;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;
}
