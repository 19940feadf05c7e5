//! Tool trait definitions.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::budget::{BudgetSummary, BudgetTracker, GuardedResponse};
use crate::types::{ToolDefinition, Usage};

/// Successful result of one tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    pub content: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Only present when the call was budget-tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_tracker: Option<BudgetSummary>,
}

impl From<GuardedResponse> for ToolOutput {
    fn from(guarded: GuardedResponse) -> Self {
        Self {
            content: guarded.response.content,
            model: guarded.response.model,
            usage: guarded.response.usage,
            cost_tracker: guarded.cost_tracker,
        }
    }
}

/// A capability the orchestrator model may request by name.
///
/// `budget` is the exchange's tracker, if any. Implementations that call a
/// provider must route through an `ExecutionGuard` so the call is checked
/// and recorded against it.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> serde_json::Value;

    async fn call(
        &self,
        input: serde_json::Value,
        budget: Option<&mut BudgetTracker>,
    ) -> Result<ToolOutput>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}

/// JSON schema for a typed tool input, always an object with `properties`.
pub fn schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    let mut value =
        serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}));

    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
        obj.entry("properties")
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    }

    value
}
