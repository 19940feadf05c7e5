//! Prelude module for convenient imports.
//!
//! ```rust
//! use llm_orchestrator::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

// Orchestration
pub use crate::agent::{Orchestrator, OrchestratorOptions, OrchestratorResult, ToolCallOutcome};

// Budget
pub use crate::budget::{
    BudgetSummary, BudgetTracker, CallOrigin, ExecutionGuard, PricingEntry, PricingTable,
};

// Providers
pub use crate::client::{ChatProvider, ChatRequest, ProviderRegistry};

// Tools
pub use crate::tools::{LlmTool, Tool, ToolFactory, ToolOutput, ToolRegistry};

// Types
pub use crate::types::{ChatResponse, Message, Role, ToolCall, Usage};
