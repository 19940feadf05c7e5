//! Environment variable configuration provider.
//!
//! `budget.max_cost_cents` is read from `LLM_ORCH_BUDGET_MAX_COST_CENTS`.

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

pub const DEFAULT_ENV_PREFIX: &str = "LLM_ORCH_";

/// Environment variables are never written at runtime; modifying them is not thread-safe.
#[derive(Debug, Clone)]
pub struct EnvConfigProvider {
    prefix: String,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::prefixed(DEFAULT_ENV_PREFIX)
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn env_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.to_uppercase().replace('.', "_"))
    }
}

impl Default for EnvConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ConfigProvider for EnvConfigProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        match std::env::var(self.env_key(key)) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::Env(e)),
        }
    }

    /// Keys come back lower-cased with `_` as separator; the mapping from
    /// variable names back to dotted keys is ambiguous.
    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let env_prefix = self.env_key(prefix);
        Ok(std::env::vars()
            .filter_map(|(k, _)| {
                k.starts_with(&env_prefix)
                    .then(|| k[self.prefix.len()..].to_lowercase())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_conversion() {
        let provider = EnvConfigProvider::new();
        assert_eq!(
            provider.env_key("budget.max_cost_cents"),
            "LLM_ORCH_BUDGET_MAX_COST_CENTS"
        );

        let provider = EnvConfigProvider::prefixed("APP_");
        assert_eq!(provider.env_key("pricing.file"), "APP_PRICING_FILE");
    }

    #[tokio::test]
    async fn test_env_provider_get() {
        let provider = EnvConfigProvider::prefixed("LLM_ORCH_ENV_TEST_");

        // SAFETY: Test-only environment setup with a unique prefix
        unsafe { std::env::set_var("LLM_ORCH_ENV_TEST_MY_KEY", "my_value") };
        let value = provider.get_raw("my.key").await.unwrap();
        assert_eq!(value, Some("my_value".to_string()));
        unsafe { std::env::remove_var("LLM_ORCH_ENV_TEST_MY_KEY") };
    }

    #[tokio::test]
    async fn test_env_provider_not_found() {
        let provider = EnvConfigProvider::prefixed("NONEXISTENT_PREFIX_");
        assert_eq!(provider.get_raw("some.key").await.unwrap(), None);
    }
}
