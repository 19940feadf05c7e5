//! Pre-flight affordability check and post-flight usage recording around a
//! single provider call.

use std::fmt;

use serde::Serialize;
use tracing::{Instrument, debug, warn};

use super::tracker::{BudgetSummary, BudgetTracker, UsageSource};
use crate::client::{ChatProvider, ChatRequest};
use crate::observability::LlmCallSpan;
use crate::types::ChatResponse;
use crate::{Error, Result};

/// Who is making a guarded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOrigin {
    Orchestrator,
    Tool(String),
}

impl CallOrigin {
    pub fn tool(name: impl Into<String>) -> Self {
        Self::Tool(name.into())
    }

    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::Orchestrator => None,
            Self::Tool(name) => Some(name),
        }
    }

    pub fn source(&self) -> UsageSource {
        match self {
            Self::Orchestrator => UsageSource::Orchestrator,
            Self::Tool(_) => UsageSource::Tool,
        }
    }
}

impl fmt::Display for CallOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orchestrator => f.write_str("orchestrator"),
            Self::Tool(name) => write!(f, "tool '{}'", name),
        }
    }
}

/// Provider output plus, for tracked calls only, the budget snapshot taken
/// right after recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardedResponse {
    #[serde(flatten)]
    pub response: ChatResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_tracker: Option<BudgetSummary>,
}

impl GuardedResponse {
    pub fn is_tracked(&self) -> bool {
        self.cost_tracker.is_some()
    }
}

/// Wraps one provider call with budget enforcement.
///
/// Without a tracker the request passes through untouched. With one, the call is estimated first and
/// rejected with [`Error::InsufficientBudget`] if it cannot be afforded;
/// successful calls that report usage are then priced and recorded. A call
/// that fails at the provider is never recorded.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionGuard<'a> {
    provider: &'a dyn ChatProvider,
    origin: &'a CallOrigin,
    conservative_cap: Option<u64>,
}

impl<'a> ExecutionGuard<'a> {
    pub fn new(provider: &'a dyn ChatProvider, origin: &'a CallOrigin) -> Self {
        Self {
            provider,
            origin,
            conservative_cap: None,
        }
    }

    /// Clamp the resolved output limit to at most `cap` tokens.
    pub fn conservative(mut self, cap: Option<u64>) -> Self {
        self.conservative_cap = cap;
        self
    }

    pub fn origin(&self) -> &CallOrigin {
        self.origin
    }

    pub async fn run(
        &self,
        mut request: ChatRequest,
        tracker: Option<&mut BudgetTracker>,
    ) -> Result<GuardedResponse> {
        let Some(tracker) = tracker else {
            let response = self.invoke(request, None).await?;
            return Ok(GuardedResponse {
                response,
                cost_tracker: None,
            });
        };

        let mut limit = request
            .max_tokens
            .unwrap_or_else(|| tracker.default_max_tokens(&request.model));
        if let Some(cap) = self.conservative_cap {
            limit = limit.min(cap);
        }

        let prompt_chars = request.prompt_chars();
        if !tracker.can_afford_query(&request.model, prompt_chars, Some(limit)) {
            let remaining_cents = tracker.remaining_budget_cents();
            let estimated_cents = tracker
                .estimate_query_cost(&request.model, prompt_chars, Some(limit))
                .unwrap_or_default();
            warn!(
                origin = %self.origin,
                model = %request.model,
                remaining_cents,
                estimated_cents,
                "Rejected call: insufficient budget"
            );
            return Err(Error::InsufficientBudget {
                origin: self.origin.to_string(),
                remaining_cents,
                estimated_cents,
            });
        }

        request.max_tokens = Some(limit);
        let model = request.model.clone();
        let response = self.invoke(request, Some(tracker.remaining_budget_cents())).await?;

        match response.usage {
            Some(usage) => {
                let record = tracker.record_usage(
                    &model,
                    usage.input_tokens,
                    usage.output_tokens,
                    self.origin.tool_name(),
                );
                debug!(
                    origin = %self.origin,
                    cost_cents = record.cost_cents,
                    "Recorded guarded call"
                );
            }
            None => {
                debug!(origin = %self.origin, model = %model, "Provider reported no usage, nothing recorded");
            }
        }

        Ok(GuardedResponse {
            response,
            cost_tracker: Some(tracker.summary()),
        })
    }

    async fn invoke(
        &self,
        request: ChatRequest,
        remaining_cents: Option<u64>,
    ) -> Result<ChatResponse> {
        let span = LlmCallSpan::new(
            &request.model,
            self.origin,
            self.provider.name(),
            request.max_tokens,
        );
        if let Some(remaining) = remaining_cents {
            span.record_remaining(remaining);
        }

        let result = self
            .provider
            .complete(request)
            .instrument(span.span().clone())
            .await;

        match &result {
            Ok(response) => {
                if let Some(usage) = response.usage {
                    span.record_usage(usage.input_tokens, usage.output_tokens);
                }
            }
            Err(e) => span.record_error(e),
        }
        span.finish();

        result.map_err(|e| Error::Provider {
            origin: self.origin.to_string(),
            source: Box::new(e),
        })
    }
}
