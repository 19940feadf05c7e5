//! Per-exchange caller options.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorOptions {
    /// Spending ceiling for the whole exchange. `None` disables tracking
    /// entirely; `Some(0)` is a real, zero budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost_cents: Option<u64>,
    /// Caps the orchestrator's own output limit. Tool calls are unaffected.
    #[serde(default)]
    pub conservative_mode: bool,
    /// Explicit orchestrator output limit; wins over the adaptive default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl OrchestratorOptions {
    pub fn max_cost_cents(mut self, cents: u64) -> Self {
        self.max_cost_cents = Some(cents);
        self
    }

    pub fn conservative(mut self, enabled: bool) -> Self {
        self.conservative_mode = enabled;
        self
    }

    pub fn max_tokens(mut self, tokens: u64) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn is_tracked(&self) -> bool {
        self.max_cost_cents.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let options: OrchestratorOptions =
            serde_json::from_str(r#"{"maxCostCents": 50, "conservativeMode": true}"#).unwrap();
        assert_eq!(options.max_cost_cents, Some(50));
        assert!(options.conservative_mode);
        assert!(options.is_tracked());
    }

    #[test]
    fn test_zero_budget_is_still_tracked() {
        assert!(OrchestratorOptions::default().max_cost_cents(0).is_tracked());
        assert!(!OrchestratorOptions::default().is_tracked());
    }
}
