//! The orchestrator loop.

use std::sync::Arc;

use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

use super::{OrchestratorOptions, OrchestratorResult, ToolCallOutcome};
use crate::budget::{BudgetTracker, CallOrigin, EstimationConfig, ExecutionGuard, PricingTable};
use crate::client::{ChatProvider, ChatRequest};
use crate::observability::ExchangeSpan;
use crate::tools::{Tool, ToolRegistry};
use crate::types::ToolCall;
use crate::{Error, Result};

/// Sends a message to the orchestrator model and executes the tool calls it
/// requests, sequentially and in order.
///
/// Each [`run`](Orchestrator::run) is an independent exchange: when the
/// options carry a spending ceiling a fresh [`BudgetTracker`] is created for
/// it and shared, one call at a time, by the orchestrator turn and every
/// tool call. Errors from the orchestrator turn abort the exchange; errors
/// from a tool call are reported in that call's outcome.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    provider: Arc<dyn ChatProvider>,
    model: String,
    system_prompt: Option<String>,
    tools: ToolRegistry,
    pricing: Arc<PricingTable>,
    estimation: EstimationConfig,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn pricing(&self) -> &Arc<PricingTable> {
        &self.pricing
    }

    pub async fn run(
        &self,
        message: impl Into<String>,
        options: &OrchestratorOptions,
    ) -> Result<OrchestratorResult> {
        let exchange_id = Uuid::new_v4().to_string();
        let span = ExchangeSpan::new(&exchange_id, &self.model, options.is_tracked());
        self.run_exchange(message.into(), options)
            .instrument(span)
            .await
    }

    async fn run_exchange(
        &self,
        message: String,
        options: &OrchestratorOptions,
    ) -> Result<OrchestratorResult> {
        let mut tracker = options.max_cost_cents.map(|max| {
            BudgetTracker::new(max, Arc::clone(&self.pricing))
                .with_estimation(self.estimation.clone())
        });

        let mut request = ChatRequest::prompt(&self.model, message)
            .with_tools(self.tools.definitions());
        if let Some(system) = &self.system_prompt {
            request = request.with_system(system);
        }
        request.max_tokens = options.max_tokens;
        request.temperature = options.temperature;

        let conservative_cap = options
            .conservative_mode
            .then_some(self.estimation.conservative_cap);

        let origin = CallOrigin::Orchestrator;
        let guarded = ExecutionGuard::new(self.provider.as_ref(), &origin)
            .conservative(conservative_cap)
            .run(request, tracker.as_mut())
            .await?;
        let response = guarded.response;

        debug!(
            tool_calls = response.tool_calls.len(),
            "Orchestrator turn complete"
        );

        let mut tool_results = Vec::with_capacity(response.tool_calls.len());
        for call in &response.tool_calls {
            let outcome = self.execute_tool_call(call, tracker.as_mut()).await;
            tool_results.push(outcome);
        }

        let cost_tracker = tracker.as_ref().map(BudgetTracker::summary);

        let current = tracing::Span::current();
        current.record("tool_calls", tool_results.len() as u64);
        if let Some(summary) = &cost_tracker {
            current.record("total_cost_cents", summary.total_cost_cents);
        }
        info!(
            tool_calls = tool_results.len(),
            failed = tool_results.iter().filter(|o| o.is_error()).count(),
            total_cost_cents = cost_tracker.as_ref().map(|s| s.total_cost_cents),
            "Exchange complete"
        );

        Ok(OrchestratorResult {
            content: response.content,
            model: response.model,
            usage: response.usage,
            tool_results,
            cost_tracker,
        })
    }

    async fn execute_tool_call(
        &self,
        call: &ToolCall,
        budget: Option<&mut BudgetTracker>,
    ) -> ToolCallOutcome {
        match self.try_tool_call(call, budget).await {
            Ok(output) => ToolCallOutcome::success(call.clone(), output),
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Tool call failed");
                ToolCallOutcome::failure(call.clone(), e.to_string())
            }
        }
    }

    async fn try_tool_call(
        &self,
        call: &ToolCall,
        budget: Option<&mut BudgetTracker>,
    ) -> Result<crate::tools::ToolOutput> {
        let tool: &Arc<dyn Tool> = self
            .tools
            .get(&call.name)
            .ok_or_else(|| Error::ToolNotFound(call.name.clone()))?;

        let input = call
            .parse_arguments()
            .map_err(|e| Error::InvalidArguments {
                tool: call.name.clone(),
                message: e.to_string(),
            })?;

        tool.call(input, budget).await
    }
}

/// Builder for [`Orchestrator`]. `provider` and `model` are required.
#[derive(Debug, Default)]
pub struct OrchestratorBuilder {
    provider: Option<Arc<dyn ChatProvider>>,
    model: Option<String>,
    system_prompt: Option<String>,
    tools: ToolRegistry,
    pricing: Option<Arc<PricingTable>>,
    estimation: EstimationConfig,
}

impl OrchestratorBuilder {
    pub fn provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.register(Arc::new(tool));
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Defaults to the built-in pricing table.
    pub fn pricing(mut self, pricing: Arc<PricingTable>) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn estimation(mut self, estimation: EstimationConfig) -> Self {
        self.estimation = estimation;
        self
    }

    pub fn build(self) -> Result<Orchestrator> {
        let provider = self
            .provider
            .ok_or_else(|| Error::Config("orchestrator provider is required".into()))?;
        let model = self
            .model
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| Error::Config("orchestrator model is required".into()))?;

        Ok(Orchestrator {
            provider,
            model,
            system_prompt: self.system_prompt,
            tools: self.tools,
            pricing: self
                .pricing
                .unwrap_or_else(|| Arc::new(PricingTable::builder().with_defaults().build())),
            estimation: self.estimation,
        })
    }
}
