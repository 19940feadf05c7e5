//! Model pricing and token-limit metadata.
//!
//! A [`PricingTable`] is built once and shared read-only as `Arc<PricingTable>`.
//! Per-model prices can be overridden via environment variables or loaded
//! from a JSON / YAML file.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult};

/// Preferred fallback pricing for unknown models: high-capability first, then a cheaper default.
pub const DEFAULT_FALLBACK_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini"];

/// Pricing and limits for a single model identifier.
///
/// Costs are fractional dollars per single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub max_total_tokens: u64,
    pub max_input_tokens: u64,
    pub max_output_tokens: u64,
    pub input_cost_per_token: Decimal,
    pub output_cost_per_token: Decimal,
}

impl PricingEntry {
    pub const fn new(
        max_total_tokens: u64,
        max_input_tokens: u64,
        max_output_tokens: u64,
        input_cost_per_token: Decimal,
        output_cost_per_token: Decimal,
    ) -> Self {
        Self {
            max_total_tokens,
            max_input_tokens,
            max_output_tokens,
            input_cost_per_token,
            output_cost_per_token,
        }
    }

    /// Build an entry from per-million-token dollar rates, the unit providers publish.
    pub fn per_million(
        max_total_tokens: u64,
        max_output_tokens: u64,
        input_per_mtok: Decimal,
        output_per_mtok: Decimal,
    ) -> Self {
        let mtok = dec!(1_000_000);
        Self {
            max_total_tokens,
            max_input_tokens: max_total_tokens.saturating_sub(max_output_tokens),
            max_output_tokens,
            input_cost_per_token: input_per_mtok / mtok,
            output_cost_per_token: output_per_mtok / mtok,
        }
    }

    fn validate(&self, model: &str) -> ConfigResult<()> {
        if self.max_total_tokens == 0 || self.max_input_tokens == 0 || self.max_output_tokens == 0
        {
            return Err(ConfigError::InvalidValue {
                key: format!("models.{model}"),
                message: "token limits must be positive".into(),
            });
        }
        if self.input_cost_per_token.is_sign_negative()
            || self.output_cost_per_token.is_sign_negative()
        {
            return Err(ConfigError::InvalidValue {
                key: format!("models.{model}"),
                message: "per-token costs must be non-negative".into(),
            });
        }
        Ok(())
    }
}

/// On-disk shape of a pricing file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PricingFile {
    #[serde(default)]
    models: HashMap<String, PricingEntry>,
    #[serde(default)]
    fallback_models: Option<Vec<String>>,
}

/// Static mapping from exact model identifier to [`PricingEntry`].
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    models: HashMap<String, PricingEntry>,
    fallback_models: Vec<String>,
}

impl PricingTable {
    pub fn builder() -> PricingTableBuilder {
        PricingTableBuilder::new()
    }

    /// Built-in prices plus environment overrides.
    pub fn from_env() -> Self {
        PricingTableBuilder::new().from_env().build()
    }

    /// Exact-key lookup. A miss means the model is unknown, which is not an error.
    pub fn get(&self, model: &str) -> Option<&PricingEntry> {
        self.models.get(model)
    }

    /// Exact entry, else the first fallback model that has pricing.
    pub fn resolve(&self, model: &str) -> Option<&PricingEntry> {
        self.get(model).or_else(|| {
            self.fallback_models
                .iter()
                .find_map(|fallback| self.models.get(fallback))
        })
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    pub fn fallback_models(&self) -> &[String] {
        &self.fallback_models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Load a table from a `.json`, `.yaml` or `.yml` file.
    pub async fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        Self::parse(&content, is_yaml)
    }

    /// Parse a pricing document. Entries are validated before the table is built.
    pub fn parse(content: &str, yaml: bool) -> ConfigResult<Self> {
        let file: PricingFile = if yaml {
            serde_yaml_bw::from_str(content).map_err(|e| ConfigError::Provider {
                message: format!("invalid pricing YAML: {e}"),
            })?
        } else {
            serde_json::from_str(content)?
        };

        for (model, entry) in &file.models {
            entry.validate(model)?;
        }

        let mut builder = PricingTableBuilder::new();
        builder.models = file.models;
        if let Some(fallbacks) = file.fallback_models {
            builder = builder.fallback_models(fallbacks);
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Default)]
pub struct PricingTableBuilder {
    models: HashMap<String, PricingEntry>,
    fallback_models: Option<Vec<String>>,
}

impl PricingTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(mut self) -> Self {
        let defaults = [
            ("gpt-4o", PricingEntry::per_million(128_000, 16_384, dec!(2.50), dec!(10.00))),
            ("gpt-4o-mini", PricingEntry::per_million(128_000, 16_384, dec!(0.15), dec!(0.60))),
            ("gpt-4.1", PricingEntry::per_million(1_047_576, 32_768, dec!(2.00), dec!(8.00))),
            ("gpt-4.1-mini", PricingEntry::per_million(1_047_576, 32_768, dec!(0.40), dec!(1.60))),
            ("gpt-4", PricingEntry::per_million(8_192, 4_096, dec!(30.00), dec!(60.00))),
            ("o3-mini", PricingEntry::per_million(200_000, 100_000, dec!(1.10), dec!(4.40))),
            ("claude-opus-4-5", PricingEntry::per_million(200_000, 64_000, dec!(5.00), dec!(25.00))),
            ("claude-sonnet-4-5", PricingEntry::per_million(200_000, 64_000, dec!(3.00), dec!(15.00))),
            ("claude-haiku-4-5", PricingEntry::per_million(200_000, 64_000, dec!(1.00), dec!(5.00))),
            ("gemini-2.5-pro", PricingEntry::per_million(1_048_576, 65_536, dec!(1.25), dec!(10.00))),
            ("gemini-2.5-flash", PricingEntry::per_million(1_048_576, 65_536, dec!(0.30), dec!(2.50))),
        ];
        for (name, entry) in defaults {
            self.models.insert(name.into(), entry);
        }
        self
    }

    pub fn model(mut self, name: impl Into<String>, entry: PricingEntry) -> Self {
        self.models.insert(name.into(), entry);
        self
    }

    pub fn fallback_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_models = Some(models.into_iter().map(Into::into).collect());
        self
    }

    /// Defaults, then `LLM_PRICING_<MODEL>_INPUT` / `_OUTPUT` overrides (dollars per token).
    pub fn from_env(mut self) -> Self {
        self = self.with_defaults();

        let names: Vec<String> = self.models.keys().cloned().collect();
        for name in names {
            if let Some((input, output)) = Self::parse_env_pricing(&name)
                && let Some(entry) = self.models.get_mut(&name)
            {
                tracing::debug!(model = %name, "Applied pricing override from environment");
                entry.input_cost_per_token = input;
                entry.output_cost_per_token = output;
            }
        }

        self
    }

    fn env_key(model: &str) -> String {
        model
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn parse_env_pricing(model: &str) -> Option<(Decimal, Decimal)> {
        let key = Self::env_key(model);
        let read = |suffix: &str| {
            std::env::var(format!("LLM_PRICING_{key}_{suffix}"))
                .ok()
                .and_then(|v| Decimal::from_str(v.trim()).ok())
                .filter(|d| !d.is_sign_negative())
        };
        Some((read("INPUT")?, read("OUTPUT")?))
    }

    pub fn build(self) -> PricingTable {
        let fallback_models = self.fallback_models.unwrap_or_else(|| {
            DEFAULT_FALLBACK_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect()
        });

        PricingTable {
            models: self.models,
            fallback_models,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(input: Decimal, output: Decimal) -> PricingEntry {
        PricingEntry::new(8_192, 4_096, 4_096, input, output)
    }

    #[test]
    fn test_exact_lookup() {
        let table = PricingTable::builder()
            .model("known-model", entry(dec!(0.00003), dec!(0.00006)))
            .build();

        assert!(table.get("known-model").is_some());
        assert!(table.get("Known-Model").is_none());
        assert!(table.get("").is_none());
    }

    #[test]
    fn test_resolve_prefers_first_fallback() {
        let table = PricingTable::builder()
            .model("big", entry(dec!(0.01), dec!(0.02)))
            .model("small", entry(dec!(0.001), dec!(0.002)))
            .fallback_models(["big", "small"])
            .build();

        let resolved = table.resolve("unknown").unwrap();
        assert_eq!(resolved.input_cost_per_token, dec!(0.01));
    }

    #[test]
    fn test_resolve_skips_missing_fallback() {
        let table = PricingTable::builder()
            .model("small", entry(dec!(0.001), dec!(0.002)))
            .fallback_models(["missing", "small"])
            .build();

        let resolved = table.resolve("unknown").unwrap();
        assert_eq!(resolved.input_cost_per_token, dec!(0.001));
    }

    #[test]
    fn test_resolve_none_without_fallback_pricing() {
        let table = PricingTable::builder().build();
        assert!(table.resolve("unknown").is_none());
    }

    #[test]
    fn test_per_million_conversion() {
        let entry = PricingEntry::per_million(128_000, 16_384, dec!(2.50), dec!(10.00));
        assert_eq!(entry.input_cost_per_token, dec!(0.0000025));
        assert_eq!(entry.output_cost_per_token, dec!(0.00001));
        assert_eq!(entry.max_input_tokens, 128_000 - 16_384);
    }

    #[test]
    fn test_defaults_include_fallback_chain() {
        let table = PricingTable::builder().with_defaults().build();
        for model in DEFAULT_FALLBACK_MODELS {
            assert!(table.contains(model));
        }
        assert_eq!(table.fallback_models()[0], "gpt-4o");
    }

    #[test]
    fn test_env_key() {
        assert_eq!(PricingTableBuilder::env_key("gpt-4o-mini"), "GPT_4O_MINI");
        assert_eq!(PricingTableBuilder::env_key("gemini-2.5-pro"), "GEMINI_2_5_PRO");
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "models": {
                "known-model": {
                    "max_total_tokens": 8192,
                    "max_input_tokens": 4096,
                    "max_output_tokens": 4096,
                    "input_cost_per_token": "0.00003",
                    "output_cost_per_token": "0.00006"
                }
            },
            "fallback_models": ["known-model"]
        }"#;

        let table = PricingTable::parse(json, false).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.resolve("anything").is_some());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "models:\n  tiny:\n    max_total_tokens: 1000\n    max_input_tokens: 500\n    max_output_tokens: 500\n    input_cost_per_token: \"0.000001\"\n    output_cost_per_token: \"0.000002\"\n";

        let table = PricingTable::parse(yaml, true).unwrap();
        assert_eq!(table.get("tiny").unwrap().max_output_tokens, 500);
        assert_eq!(table.fallback_models()[0], "gpt-4o");
    }

    #[test]
    fn test_parse_rejects_zero_limits() {
        let json = r#"{"models": {"bad": {
            "max_total_tokens": 0, "max_input_tokens": 1, "max_output_tokens": 1,
            "input_cost_per_token": "0", "output_cost_per_token": "0"
        }}}"#;

        let err = PricingTable::parse(json, false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_rejects_negative_cost() {
        let json = r#"{"models": {"bad": {
            "max_total_tokens": 10, "max_input_tokens": 5, "max_output_tokens": 5,
            "input_cost_per_token": "-0.1", "output_cost_per_token": "0"
        }}}"#;

        assert!(PricingTable::parse(json, false).is_err());
    }
}
