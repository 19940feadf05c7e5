//! Budget tracking for a single budgeted exchange.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::estimate::{EstimateError, EstimationConfig, cost_cents};
use super::pricing::PricingTable;

/// Which side of the exchange incurred a cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageSource {
    Orchestrator,
    Tool,
}

/// One completed, provider-reported LLM call. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_cents: u64,
    pub timestamp: DateTime<Utc>,
    pub source: UsageSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl UsageRecord {
    pub fn orchestrator(
        model: impl Into<String>,
        input_tokens: u64,
        output_tokens: u64,
        cost_cents: u64,
    ) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
            cost_cents,
            timestamp: Utc::now(),
            source: UsageSource::Orchestrator,
            tool_name: None,
        }
    }

    pub fn tool(
        tool_name: impl Into<String>,
        model: impl Into<String>,
        input_tokens: u64,
        output_tokens: u64,
        cost_cents: u64,
    ) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
            cost_cents,
            timestamp: Utc::now(),
            source: UsageSource::Tool,
            tool_name: Some(tool_name.into()),
        }
    }
}

/// Read-only snapshot of tracker state, computed fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_cost_cents: u64,
    pub max_cost_cents: u64,
    pub remaining_budget_cents: u64,
    /// Exceeds 100 on overspend. `None` for a zero ceiling, where the ratio is undefined.
    pub budget_used_percentage: Option<f64>,
    pub total_queries: usize,
    pub orchestrator_queries: usize,
    pub tool_queries: usize,
}

/// Spend-to-date for one exchange and the authority on affordability.
///
/// One tracker lives exactly as long as one orchestrator turn plus the tool
/// calls it triggers. Callers that opt out of budgeting pass no tracker at all.
#[derive(Debug, Clone)]
pub struct BudgetTracker {
    max_cost_cents: u64,
    total_cost_cents: u64,
    usage_history: Vec<UsageRecord>,
    pricing: Arc<PricingTable>,
    estimation: EstimationConfig,
}

impl BudgetTracker {
    pub fn new(max_cost_cents: u64, pricing: Arc<PricingTable>) -> Self {
        Self {
            max_cost_cents,
            total_cost_cents: 0,
            usage_history: Vec::new(),
            pricing,
            estimation: EstimationConfig::default(),
        }
    }

    pub fn with_estimation(mut self, estimation: EstimationConfig) -> Self {
        self.estimation = estimation;
        self
    }

    pub fn max_cost_cents(&self) -> u64 {
        self.max_cost_cents
    }

    pub fn total_cost_cents(&self) -> u64 {
        self.total_cost_cents
    }

    pub fn usage_history(&self) -> &[UsageRecord] {
        &self.usage_history
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn estimation(&self) -> &EstimationConfig {
        &self.estimation
    }

    /// Never negative, even after overspend.
    pub fn remaining_budget_cents(&self) -> u64 {
        self.max_cost_cents.saturating_sub(self.total_cost_cents)
    }

    /// Inclusive: a cost equal to the remaining budget is affordable.
    pub fn can_afford(&self, cost_cents: u64) -> bool {
        cost_cents <= self.remaining_budget_cents()
    }

    /// Cost in cents, rounded up. Unknown models fall back to the table's
    /// fallback pricing, and to zero when none exists. A cost too large to
    /// represent saturates at `u64::MAX`.
    pub fn estimate_cost(&self, model: &str, input_tokens: u64, output_tokens: u64) -> u64 {
        let Some(entry) = self.pricing.resolve(model) else {
            warn!(model, "No pricing for model or fallbacks, assuming zero cost");
            return 0;
        };

        if !self.pricing.contains(model) {
            debug!(model, "Estimating cost with fallback pricing");
        }

        match cost_cents(model, entry, input_tokens, output_tokens) {
            Ok(cents) => cents,
            Err(e @ EstimateError::Overflow { .. }) => {
                warn!(model, error = %e, "Cost overflowed, saturating");
                u64::MAX
            }
            Err(e) => {
                warn!(model, error = %e, "Cost estimation failed, assuming zero cost");
                0
            }
        }
    }

    /// Pre-flight cost of a call whose prompt is `prompt_chars` characters long.
    ///
    /// Without `expected_output_tokens` the adaptive default limit is assumed.
    pub fn estimate_query_cost(
        &self,
        model: &str,
        prompt_chars: usize,
        expected_output_tokens: Option<u64>,
    ) -> Result<u64, EstimateError> {
        let input_tokens = self.estimation.estimate_input_tokens(prompt_chars)?;
        let output_tokens =
            expected_output_tokens.unwrap_or_else(|| self.default_max_tokens(model));

        match self.pricing.resolve(model) {
            Some(entry) => cost_cents(model, entry, input_tokens, output_tokens),
            None => Ok(0),
        }
    }

    /// Never fails: an estimation error is treated as affordable, and the
    /// actual cost is reconciled after the call.
    pub fn can_afford_query(
        &self,
        model: &str,
        prompt_chars: usize,
        expected_output_tokens: Option<u64>,
    ) -> bool {
        match self.estimate_query_cost(model, prompt_chars, expected_output_tokens) {
            Ok(estimated) => self.can_afford(estimated),
            Err(e) => {
                warn!(model, error = %e, "Query estimate failed, assuming affordable");
                true
            }
        }
    }

    /// Fraction of the budget still available, `0.0` when the ceiling is zero.
    pub fn remaining_fraction(&self) -> f64 {
        if self.max_cost_cents == 0 {
            return 0.0;
        }
        self.remaining_budget_cents() as f64 / self.max_cost_cents as f64
    }

    /// Output token ceiling for the next call, tightened as the budget depletes.
    pub fn default_max_tokens(&self, model: &str) -> u64 {
        match self.pricing.get(model) {
            Some(entry) => self
                .estimation
                .throttle(entry.max_output_tokens, self.remaining_fraction()),
            None => self.estimation.unknown_model_max_tokens,
        }
    }

    pub fn add_usage(&mut self, record: UsageRecord) {
        self.total_cost_cents = self.total_cost_cents.saturating_add(record.cost_cents);
        self.usage_history.push(record);
    }

    /// Price actual provider-reported usage and append it to the history.
    pub fn record_usage(
        &mut self,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
        tool_name: Option<&str>,
    ) -> &UsageRecord {
        let cost = self.estimate_cost(model, input_tokens, output_tokens);
        let record = match tool_name {
            Some(name) => UsageRecord::tool(name, model, input_tokens, output_tokens, cost),
            None => UsageRecord::orchestrator(model, input_tokens, output_tokens, cost),
        };

        debug!(
            model,
            input_tokens,
            output_tokens,
            cost_cents = cost,
            source = ?record.source,
            "Recorded usage"
        );

        self.add_usage(record);
        &self.usage_history[self.usage_history.len() - 1]
    }

    pub fn summary(&self) -> BudgetSummary {
        let orchestrator_queries = self
            .usage_history
            .iter()
            .filter(|r| r.source == UsageSource::Orchestrator)
            .count();
        let tool_queries = self
            .usage_history
            .iter()
            .filter(|r| r.source == UsageSource::Tool)
            .count();

        let budget_used_percentage = (self.max_cost_cents > 0)
            .then(|| self.total_cost_cents as f64 / self.max_cost_cents as f64 * 100.0);

        BudgetSummary {
            total_cost_cents: self.total_cost_cents,
            max_cost_cents: self.max_cost_cents,
            remaining_budget_cents: self.remaining_budget_cents(),
            budget_used_percentage,
            total_queries: self.usage_history.len(),
            orchestrator_queries,
            tool_queries,
        }
    }
}
