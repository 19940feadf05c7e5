//! Core request/response types shared by providers, tools and the orchestrator.

mod message;
mod response;
mod tool;

pub use message::{Message, Role};
pub use response::{ChatResponse, ToolCall, Usage};
pub use tool::ToolDefinition;
