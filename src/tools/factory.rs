//! Declarative tool construction from JSON or YAML records.
//!
//! ```yaml
//! - name: summarize
//!   description: Summarize a passage of text
//!   provider: openai
//!   model: gpt-4o-mini
//!   max_tokens: 400
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{LlmTool, Tool, ToolRegistry};
use crate::client::ProviderRegistry;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,
    pub description: String,
    /// Key into the [`ProviderRegistry`].
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
}

/// Maps [`ToolConfig`] records onto [`LlmTool`]s via a provider registry.
#[derive(Debug, Clone)]
pub struct ToolFactory {
    providers: ProviderRegistry,
}

impl ToolFactory {
    pub fn new(providers: ProviderRegistry) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn create(&self, config: &ToolConfig) -> Result<Arc<dyn Tool>> {
        if config.name.trim().is_empty() {
            return Err(Error::Config("tool name must not be empty".into()));
        }

        let provider = self.providers.get(&config.provider).ok_or_else(|| {
            Error::Config(format!(
                "tool '{}' references unknown provider '{}'",
                config.name, config.provider
            ))
        })?;

        let mut tool = LlmTool::new(
            &config.name,
            &config.description,
            provider,
            &config.model,
        );
        if let Some(system) = &config.system_prompt {
            tool = tool.with_system_prompt(system);
        }
        if let Some(max_tokens) = config.max_tokens {
            tool = tool.with_max_tokens(max_tokens);
        }
        Ok(Arc::new(tool))
    }

    /// Names must be unique across `configs`.
    pub fn build_registry(&self, configs: &[ToolConfig]) -> Result<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        for config in configs {
            if registry.contains(&config.name) {
                return Err(Error::Config(format!(
                    "duplicate tool name '{}'",
                    config.name
                )));
            }
            registry.register(self.create(config)?);
        }
        info!(tools = registry.len(), "Built tool registry");
        Ok(registry)
    }

    pub fn parse_configs(content: &str, yaml: bool) -> Result<Vec<ToolConfig>> {
        if yaml {
            serde_yaml_bw::from_str(content).map_err(|e| Error::Config(e.to_string()))
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }

    /// JSON array or YAML list, chosen by extension.
    pub async fn load_configs(path: impl AsRef<Path>) -> Result<Vec<ToolConfig>> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        Self::parse_configs(&content, yaml)
    }

    pub async fn load_registry(&self, path: impl AsRef<Path>) -> Result<ToolRegistry> {
        let configs = Self::load_configs(path).await?;
        self.build_registry(&configs)
    }
}
