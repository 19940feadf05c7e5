//! Tool invocation layer.
//!
//! Every tool the orchestrator can call is itself an LLM call, run through an
//! [`ExecutionGuard`](crate::budget::ExecutionGuard) so it shares the
//! exchange's budget.

mod factory;
mod llm;
mod registry;
mod traits;

pub use factory::{ToolConfig, ToolFactory};
pub use llm::{LlmTool, LlmToolInput};
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolOutput, schema_for};
