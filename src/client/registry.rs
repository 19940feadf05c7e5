//! Named provider lookup for declaratively configured tools.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{AnthropicProvider, ChatProvider, OpenAiCompatibleProvider};
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ChatProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every provider whose API key is present in the environment:
    /// `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `OPENROUTER_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let mut registry = Self::new();

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            registry.register("openai", OpenAiCompatibleProvider::openai(key)?);
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            registry.register("anthropic", AnthropicProvider::new(key)?);
        }
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            registry.register("openrouter", OpenAiCompatibleProvider::openrouter(key)?);
        }

        Ok(registry)
    }

    pub fn register(&mut self, name: impl Into<String>, provider: impl ChatProvider + 'static) {
        self.register_arc(name, Arc::new(provider));
    }

    pub fn register_arc(&mut self, name: impl Into<String>, provider: Arc<dyn ChatProvider>) {
        let name = name.into();
        debug!(provider = %name, "Registered chat provider");
        self.providers.insert(name, provider);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ChatProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
