//! A tool backed by a single LLM call.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Tool, ToolOutput, schema_for};
use crate::budget::{BudgetTracker, CallOrigin, ExecutionGuard};
use crate::client::{ChatProvider, ChatRequest};
use crate::{Error, Result};

/// Arguments the orchestrator model passes to an [`LlmTool`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LlmToolInput {
    /// The prompt to send to the tool's model.
    pub prompt: String,
    /// Upper bound on generated tokens for this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
}

/// Sends the requested prompt to a fixed provider and model.
///
/// A configured `max_tokens` is explicit caller intent and takes precedence
/// over the budget-adaptive default; a per-call `max_tokens` argument wins
/// over both.
#[derive(Debug, Clone)]
pub struct LlmTool {
    name: String,
    description: String,
    provider: Arc<dyn ChatProvider>,
    model: String,
    system_prompt: Option<String>,
    max_tokens: Option<u64>,
    origin: CallOrigin,
}

impl LlmTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        provider: Arc<dyn ChatProvider>,
        model: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            origin: CallOrigin::tool(name.clone()),
            name,
            description: description.into(),
            provider,
            model: model.into(),
            system_prompt: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &Arc<dyn ChatProvider> {
        &self.provider
    }

    fn parse_input(&self, input: serde_json::Value) -> Result<LlmToolInput> {
        serde_json::from_value(input).map_err(|e| Error::InvalidArguments {
            tool: self.name.clone(),
            message: e.to_string(),
        })
    }

    fn build_request(&self, input: LlmToolInput) -> ChatRequest {
        let mut request = ChatRequest::prompt(&self.model, input.prompt);
        if let Some(system) = &self.system_prompt {
            request = request.with_system(system);
        }
        request.max_tokens = input.max_tokens.or(self.max_tokens);
        request
    }
}

#[async_trait]
impl Tool for LlmTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> serde_json::Value {
        schema_for::<LlmToolInput>()
    }

    async fn call(
        &self,
        input: serde_json::Value,
        budget: Option<&mut BudgetTracker>,
    ) -> Result<ToolOutput> {
        let input = self.parse_input(input)?;
        let request = self.build_request(input);
        debug!(
            tool = %self.name,
            model = %self.model,
            provider = self.provider.name(),
            tracked = budget.is_some(),
            "Calling LLM tool"
        );

        let guarded = ExecutionGuard::new(self.provider.as_ref(), &self.origin)
            .run(request, budget)
            .await?;
        Ok(guarded.into())
    }
}
