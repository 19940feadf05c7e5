//! Chains configuration providers; earlier providers have higher priority.

use std::collections::BTreeSet;

use super::ConfigResult;
use super::provider::ConfigProvider;

#[derive(Default)]
pub struct CompositeConfigProvider {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// First added = highest priority.
    pub fn add_provider(&mut self, provider: Box<dyn ConfigProvider>) {
        self.providers.push(provider);
    }

    pub fn provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

#[async_trait::async_trait]
impl ConfigProvider for CompositeConfigProvider {
    fn name(&self) -> &str {
        "composite"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        for provider in &self.providers {
            if let Some(value) = provider.get_raw(key).await? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let mut all_keys = BTreeSet::new();
        for provider in &self.providers {
            all_keys.extend(provider.list_keys(prefix).await?);
        }
        Ok(all_keys.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigProvider;

    #[tokio::test]
    async fn test_first_match_wins() {
        let composite = CompositeConfigProvider::new()
            .provider(Box::new(
                MemoryConfigProvider::named("high").value("budget.max_cost_cents", "100"),
            ))
            .provider(Box::new(
                MemoryConfigProvider::named("low")
                    .value("budget.max_cost_cents", "900")
                    .value("pricing.file", "p.json"),
            ));

        assert_eq!(
            composite.get_raw("budget.max_cost_cents").await.unwrap(),
            Some("100".to_string())
        );
        assert_eq!(
            composite.get_raw("pricing.file").await.unwrap(),
            Some("p.json".to_string())
        );
        assert_eq!(composite.get_raw("nothing").await.unwrap(), None);
        assert_eq!(composite.provider_names(), vec!["high", "low"]);
    }
}
