//! # llm-orchestrator
//!
//! Provider-agnostic LLM tool orchestration with cost-aware budget gating.
//!
//! An orchestrator model receives the user's message and may request tool
//! calls; each tool is itself an LLM call, possibly on a different provider.
//! When the caller supplies a spending ceiling, every call in the exchange is
//! checked against it before it runs and recorded after it completes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use llm_orchestrator::{
//!     LlmTool, OpenAiCompatibleProvider, Orchestrator, OrchestratorOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), llm_orchestrator::Error> {
//!     let openai = Arc::new(OpenAiCompatibleProvider::openai("sk-...")?);
//!
//!     let orchestrator = Orchestrator::builder()
//!         .provider(openai.clone())
//!         .model("gpt-4o")
//!         .tool(LlmTool::new(
//!             "summarize",
//!             "Summarize a passage of text",
//!             openai,
//!             "gpt-4o-mini",
//!         ))
//!         .build()?;
//!
//!     let options = OrchestratorOptions::default().max_cost_cents(25);
//!     let result = orchestrator.run("Summarize the Rust book preface", &options).await?;
//!
//!     println!("{}", result.content);
//!     if let Some(summary) = result.cost_tracker {
//!         println!("spent {} cents", summary.total_cost_cents);
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod agent;
pub mod budget;
pub mod client;
pub mod config;
pub mod observability;
pub mod prelude;
pub mod tools;
pub mod types;

pub use agent::{
    Orchestrator, OrchestratorBuilder, OrchestratorOptions, OrchestratorResult, ToolCallOutcome,
    ToolCallStatus,
};
pub use budget::{
    BudgetSummary, BudgetTracker, CallOrigin, EstimationConfig, ExecutionGuard, GuardedResponse,
    PricingEntry, PricingTable, PricingTableBuilder, UsageRecord, UsageSource,
};
pub use client::{
    AnthropicProvider, ChatProvider, ChatRequest, OpenAiCompatibleProvider, ProviderRegistry,
};
pub use config::{ConfigBuilder, ConfigError, Settings};
pub use tools::{LlmTool, Tool, ToolConfig, ToolFactory, ToolOutput, ToolRegistry};
pub use types::{ChatResponse, Message, Role, ToolCall, ToolDefinition, Usage};

/// Error type for llm-orchestrator operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Provider returned an error response.
    #[error("API error (HTTP {status}): {message}", status = status.map(|s| s.to_string()).unwrap_or_else(|| "unknown".into()))]
    Api {
        message: String,
        status: Option<u16>,
        error_type: Option<String>,
    },

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider response did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Rate limit exceeded{}", match retry_after {
        Some(d) => format!(", retry in {:.0}s", d.as_secs_f64()),
        None => String::new(),
    })]
    RateLimit {
        retry_after: Option<std::time::Duration>,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A pre-flight estimate exceeded what is left of the budget. No call was made.
    #[error("Insufficient budget for {origin}: estimated {estimated_cents} cents, {remaining_cents} cents remaining")]
    InsufficientBudget {
        origin: String,
        remaining_cents: u64,
        estimated_cents: u64,
    },

    /// A provider call failed; `origin` names the orchestrator or the tool.
    #[error("{origin} call failed: {source}")]
    Provider {
        origin: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Authentication or authorization failures (401, 403)
    Authorization,
    /// Configuration, parsing, or setup errors
    Configuration,
    /// Network, rate limit, or transient errors that may succeed on retry
    Transient,
    /// Malformed tool calls or unknown tools requested by a model
    Tool,
    /// Internal errors (IO, JSON, unexpected states)
    Internal,
    /// Budget exhaustion
    ResourceLimit,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Api {
                status: Some(401 | 403),
                ..
            } => ErrorCategory::Authorization,

            Error::Config(_) | Error::Parse(_) | Error::Env(_) | Error::InvalidRequest(_) => {
                ErrorCategory::Configuration
            }

            Error::Network(_) | Error::RateLimit { .. } => ErrorCategory::Transient,
            Error::Api {
                status: Some(500..=599),
                ..
            } => ErrorCategory::Transient,

            Error::ToolNotFound(_) | Error::InvalidArguments { .. } => ErrorCategory::Tool,

            Error::InsufficientBudget { .. } => ErrorCategory::ResourceLimit,

            Error::Provider { source, .. } => source.category(),

            Error::Io(_) | Error::Json(_) | Error::Api { .. } => ErrorCategory::Internal,
        }
    }

    pub fn is_authorization_error(&self) -> bool {
        self.category() == ErrorCategory::Authorization
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_resource_limit(&self) -> bool {
        self.category() == ErrorCategory::ResourceLimit
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    pub fn is_insufficient_budget(&self) -> bool {
        matches!(self, Error::InsufficientBudget { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            Error::Provider { source, .. } => source.status_code(),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Error::RateLimit { retry_after } => *retry_after,
            Error::Provider { source, .. } => source.retry_after(),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound { key } => {
                Error::Config(format!("Key not found: {}", key))
            }
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Io(e) => Error::Io(e),
            config::ConfigError::Env(e) => Error::Env(e),
            config::ConfigError::Provider { message } => Error::Config(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Api {
            message: "Invalid API key".to_string(),
            status: Some(401),
            error_type: None,
        };
        assert!(err.to_string().contains("Invalid API key"));
        assert!(err.is_authorization_error());
    }

    #[test]
    fn test_error_is_retryable() {
        let rate_limit = Error::RateLimit { retry_after: None };
        assert!(rate_limit.is_retryable());

        let server_error = Error::Api {
            message: "Internal error".to_string(),
            status: Some(500),
            error_type: None,
        };
        assert!(server_error.is_retryable());

        let budget = Error::InsufficientBudget {
            origin: "orchestrator".into(),
            remaining_cents: 5,
            estimated_cents: 45,
        };
        assert!(!budget.is_retryable());
        assert!(budget.is_resource_limit());
    }

    #[test]
    fn test_insufficient_budget_message_cites_remaining() {
        let err = Error::InsufficientBudget {
            origin: "tool 'search'".into(),
            remaining_cents: 5,
            estimated_cents: 45,
        };
        let msg = err.to_string();
        assert!(msg.contains("tool 'search'"));
        assert!(msg.contains("5 cents remaining"));
    }

    #[test]
    fn test_provider_error_delegates_category() {
        let err = Error::Provider {
            origin: "orchestrator".into(),
            source: Box::new(Error::RateLimit {
                retry_after: Some(std::time::Duration::from_secs(3)),
            }),
        };
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(3)));
        assert!(err.to_string().starts_with("orchestrator call failed"));
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = config::ConfigError::NotFound {
            key: "budget.max_cost_cents".to_string(),
        };
        let err: Error = config_err.into();
        assert!(matches!(err, Error::Config(_)));
    }
}
