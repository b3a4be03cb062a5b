//! Static per-model pricing and the cost calculator.
//!
//! Prices are expressed per million tokens. Cost is a pure function of
//! (model, input tokens, output tokens); nothing mutates the table at runtime.

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PricingEntry {
    pub model_id: &'static str,
    pub currency: &'static str,
    pub input_cost_per_million: f64,
    pub output_cost_per_million: f64,
    /// Where the figures were taken from
    pub source: &'static str,
    pub effective_date: &'static str,
}

const PRICING_TABLE: &[PricingEntry] = &[
    PricingEntry {
        model_id: "gemini-2.5-flash",
        currency: "USD",
        input_cost_per_million: 0.35,
        output_cost_per_million: 1.05,
        source: "Google AI Studio price list",
        effective_date: "2024-07-01",
    },
    PricingEntry {
        model_id: "gemini-2.5-pro",
        currency: "USD",
        input_cost_per_million: 1.25,
        output_cost_per_million: 10.0,
        source: "Google AI Studio price list",
        effective_date: "2025-06-17",
    },
    PricingEntry {
        model_id: "gemini-2.0-flash",
        currency: "USD",
        input_cost_per_million: 0.10,
        output_cost_per_million: 0.40,
        source: "Google AI Studio price list",
        effective_date: "2025-02-05",
    },
];

/// Cost breakdown for a single AI call. Values are not rounded.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CostBreakdown {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub currency: String,
}

impl CostBreakdown {
    pub fn zero() -> Self {
        Self {
            input_cost: 0.0,
            output_cost: 0.0,
            total_cost: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Look up the pricing entry for a model
pub fn pricing_for(model_id: &str) -> Option<&'static PricingEntry> {
    PRICING_TABLE.iter().find(|entry| entry.model_id == model_id)
}

/// Full pricing table
pub fn pricing_table() -> &'static [PricingEntry] {
    PRICING_TABLE
}

/// Calculate cost for a given model and token usage.
///
/// Unpriced models cost nothing rather than failing, so recording usage never
/// depends on the table being complete.
pub fn calculate_cost(model_id: &str, input_tokens: u64, output_tokens: u64) -> CostBreakdown {
    let Some(entry) = pricing_for(model_id) else {
        tracing::debug!(model_id, "No pricing entry, recording zero cost");
        return CostBreakdown::zero();
    };

    let input_cost = input_tokens as f64 / 1_000_000.0 * entry.input_cost_per_million;
    let output_cost = output_tokens as f64 / 1_000_000.0 * entry.output_cost_per_million;

    CostBreakdown {
        input_cost,
        output_cost,
        total_cost: input_cost + output_cost,
        currency: entry.currency.to_string(),
    }
}
