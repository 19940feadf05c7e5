//! Cost-aware budget tracking and execution gating.
//!
//! A [`BudgetTracker`] is created per budgeted exchange and threaded through
//! every provider call as `Option<&mut BudgetTracker>`. [`ExecutionGuard`]
//! wraps each call with a pre-flight affordability check and post-flight
//! usage recording.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub mod estimate;
mod guard;
pub mod pricing;
mod tracker;

pub use estimate::{EstimateError, EstimationConfig, ThrottleTier};
pub use guard::{CallOrigin, ExecutionGuard, GuardedResponse};
pub use pricing::{DEFAULT_FALLBACK_MODELS, PricingEntry, PricingTable, PricingTableBuilder};
pub use tracker::{BudgetSummary, BudgetTracker, UsageRecord, UsageSource};

/// Per-token prices are in dollars; budgets are in whole cents.
pub(crate) const CENTS_PER_DOLLAR: Decimal = dec!(100);
