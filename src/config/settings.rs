//! Typed settings assembled from any [`ConfigProvider`].

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::provider::{ConfigProvider, ConfigProviderExt};
use super::{ConfigError, ConfigResult};
use crate::agent::OrchestratorOptions;
use crate::budget::{EstimationConfig, PricingTable};

pub const KEY_MAX_COST_CENTS: &str = "budget.max_cost_cents";
pub const KEY_CONSERVATIVE_MODE: &str = "budget.conservative_mode";
pub const KEY_CHARS_PER_TOKEN: &str = "estimation.chars_per_token";
pub const KEY_UNKNOWN_MODEL_MAX_TOKENS: &str = "estimation.unknown_model_max_tokens";
pub const KEY_PRICING_FILE: &str = "pricing.file";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetSettings {
    /// Presence, not magnitude, turns tracking on.
    pub max_cost_cents: Option<u64>,
    pub conservative_mode: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub budget: BudgetSettings,
    pub estimation: EstimationConfig,
    pub pricing_file: Option<PathBuf>,
}

impl Settings {
    pub async fn load<P: ConfigProvider + ?Sized>(provider: &P) -> ConfigResult<Self> {
        let mut settings = Self::default();

        settings.budget.max_cost_cents = provider.get(KEY_MAX_COST_CENTS).await?;
        if let Some(conservative) = provider.get(KEY_CONSERVATIVE_MODE).await? {
            settings.budget.conservative_mode = conservative;
        }
        if let Some(ratio) = provider.get(KEY_CHARS_PER_TOKEN).await? {
            settings.estimation.chars_per_token = ratio;
        }
        if let Some(tokens) = provider.get(KEY_UNKNOWN_MODEL_MAX_TOKENS).await? {
            settings.estimation.unknown_model_max_tokens = tokens;
        }
        settings.pricing_file = provider.get::<String>(KEY_PRICING_FILE).await?.map(PathBuf::from);

        settings.validate()?;
        debug!(
            source = provider.name(),
            max_cost_cents = ?settings.budget.max_cost_cents,
            conservative_mode = settings.budget.conservative_mode,
            "Loaded settings"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let ratio = self.estimation.chars_per_token;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: KEY_CHARS_PER_TOKEN.into(),
                message: format!("must be a positive number, got {}", ratio),
            });
        }
        if self.estimation.unknown_model_max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: KEY_UNKNOWN_MODEL_MAX_TOKENS.into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            max_cost_cents: self.budget.max_cost_cents,
            conservative_mode: self.budget.conservative_mode,
            ..Default::default()
        }
    }

    /// `pricing.file` when set, else the built-in table with env overrides.
    pub async fn pricing_table(&self) -> ConfigResult<Arc<PricingTable>> {
        let table = match &self.pricing_file {
            Some(path) => PricingTable::from_file(path).await?,
            None => PricingTable::from_env(),
        };
        Ok(Arc::new(table))
    }
}
