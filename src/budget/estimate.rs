//! Shared estimation helpers: token approximation, cent rounding, throttle tiers.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pricing::PricingEntry;
use super::CENTS_PER_DOLLAR;

/// Why a cost estimate could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("cost estimate overflowed for model '{model}'")]
    Overflow { model: String },

    #[error("negative cost estimate for model '{model}'")]
    NegativeCost { model: String },

    #[error("invalid chars-per-token ratio: {0}")]
    InvalidRatio(f64),
}

/// A token ceiling applied once remaining budget drops to `max_remaining` (fraction, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrottleTier {
    pub max_remaining: f64,
    pub max_tokens: u64,
}

/// Heuristics used for pre-flight estimation and adaptive token limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// Characters per token when approximating prompt size. Tuned for English-like text.
    pub chars_per_token: f64,
    /// Token ceiling for models missing from the pricing table.
    pub unknown_model_max_tokens: u64,
    pub minimal_tier: ThrottleTier,
    pub reduced_tier: ThrottleTier,
    /// Upper bound on the orchestrator's limit in conservative mode.
    pub conservative_cap: u64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            chars_per_token: 4.0,
            unknown_model_max_tokens: 4096,
            minimal_tier: ThrottleTier {
                max_remaining: 0.10,
                max_tokens: 512,
            },
            reduced_tier: ThrottleTier {
                max_remaining: 0.30,
                max_tokens: 2048,
            },
            conservative_cap: 1024,
        }
    }
}

impl EstimationConfig {
    pub fn with_chars_per_token(mut self, ratio: f64) -> Self {
        self.chars_per_token = ratio;
        self
    }

    pub fn with_unknown_model_max_tokens(mut self, tokens: u64) -> Self {
        self.unknown_model_max_tokens = tokens;
        self
    }

    pub fn with_conservative_cap(mut self, tokens: u64) -> Self {
        self.conservative_cap = tokens;
        self
    }

    /// Approximate token count for a prompt of `chars` characters, rounded up.
    pub fn estimate_input_tokens(&self, chars: usize) -> Result<u64, EstimateError> {
        if !self.chars_per_token.is_finite() || self.chars_per_token <= 0.0 {
            return Err(EstimateError::InvalidRatio(self.chars_per_token));
        }
        Ok((chars as f64 / self.chars_per_token).ceil() as u64)
    }

    /// Apply the budget tiers to a model's full output capacity.
    ///
    /// `remaining` is the fraction of the budget left, in `[0, 1]`.
    pub fn throttle(&self, model_max_output: u64, remaining: f64) -> u64 {
        if remaining <= self.minimal_tier.max_remaining {
            model_max_output.min(self.minimal_tier.max_tokens)
        } else if remaining <= self.reduced_tier.max_remaining {
            model_max_output.min(self.reduced_tier.max_tokens)
        } else {
            model_max_output
        }
    }

    pub fn conservative_limit(&self, limit: u64) -> u64 {
        limit.min(self.conservative_cap)
    }
}

/// `ceil((input * in_cost + output * out_cost) * 100)` in whole cents.
///
/// Rounds up so a call is never under-counted.
pub fn cost_cents(
    model: &str,
    entry: &PricingEntry,
    input_tokens: u64,
    output_tokens: u64,
) -> Result<u64, EstimateError> {
    let overflow = || EstimateError::Overflow {
        model: model.to_string(),
    };

    let input = Decimal::from_u64(input_tokens)
        .and_then(|t| t.checked_mul(entry.input_cost_per_token))
        .ok_or_else(overflow)?;
    let output = Decimal::from_u64(output_tokens)
        .and_then(|t| t.checked_mul(entry.output_cost_per_token))
        .ok_or_else(overflow)?;
    let cents = input
        .checked_add(output)
        .and_then(|dollars| dollars.checked_mul(CENTS_PER_DOLLAR))
        .ok_or_else(overflow)?;

    if cents.is_sign_negative() && !cents.is_zero() {
        return Err(EstimateError::NegativeCost {
            model: model.to_string(),
        });
    }

    cents.ceil().to_u64().ok_or_else(overflow)
}
