//! Exchange results.

use serde::{Deserialize, Serialize};

use crate::budget::BudgetSummary;
use crate::tools::ToolOutput;
use crate::types::{ToolCall, Usage};

/// Outcome of one requested tool call: its output or why it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolCallStatus {
    Result(ToolOutput),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallOutcome {
    pub call: ToolCall,
    #[serde(flatten)]
    pub status: ToolCallStatus,
}

impl ToolCallOutcome {
    pub fn success(call: ToolCall, output: ToolOutput) -> Self {
        Self {
            call,
            status: ToolCallStatus::Result(output),
        }
    }

    pub fn failure(call: ToolCall, message: impl Into<String>) -> Self {
        Self {
            call,
            status: ToolCallStatus::Error(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, ToolCallStatus::Error(_))
    }

    pub fn output(&self) -> Option<&ToolOutput> {
        match &self.status {
            ToolCallStatus::Result(output) => Some(output),
            ToolCallStatus::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ToolCallStatus::Result(_) => None,
            ToolCallStatus::Error(message) => Some(message),
        }
    }
}

/// Orchestrator text, per-tool outcomes in request order, and the final
/// budget snapshot when the exchange was tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorResult {
    pub content: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub tool_results: Vec<ToolCallOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_tracker: Option<BudgetSummary>,
}

impl OrchestratorResult {
    pub fn failed_tools(&self) -> impl Iterator<Item = &ToolCallOutcome> {
        self.tool_results.iter().filter(|o| o.is_error())
    }
}
