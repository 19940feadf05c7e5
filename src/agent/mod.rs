//! Orchestrator loop: one model turn, then the tool calls it requested.

mod options;
mod orchestrator;
mod result;

pub use options::OrchestratorOptions;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use result::{OrchestratorResult, ToolCallOutcome, ToolCallStatus};
