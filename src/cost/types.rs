//! Cost tracking type definitions

use crate::interpretation::ModelTier;
use serde::{Deserialize, Serialize};

/// Dollar rates for one model tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Dollars per 1K input tokens
    pub input_per_1k: f64,

    /// Dollars per 1K output tokens
    pub output_per_1k: f64,
}

impl ModelPricing {
    /// Blended cost of a token count split by `input_share`
    pub fn cost(&self, tokens: usize, input_share: f64) -> f64 {
        let input_tokens = tokens as f64 * input_share;
        let output_tokens = tokens as f64 * (1.0 - input_share);
        input_tokens / 1000.0 * self.input_per_1k + output_tokens / 1000.0 * self.output_per_1k
    }
}

/// Configuration for cost calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostConfig {
    /// Economy tier rates (default: $0.0005 in / $0.0015 out)
    pub economy: ModelPricing,

    /// Premium tier rates (default: $0.01 in / $0.03 out)
    pub premium: ModelPricing,

    /// Share of tokens assumed to be input (default: 0.6)
    pub input_share: f64,
}

impl CostConfig {
    pub fn pricing(&self, tier: ModelTier) -> ModelPricing {
        match tier {
            ModelTier::Economy => self.economy,
            ModelTier::Premium => self.premium,
        }
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            economy: ModelPricing {
                input_per_1k: 0.0005,
                output_per_1k: 0.0015,
            },
            premium: ModelPricing {
                input_per_1k: 0.01,
                output_per_1k: 0.03,
            },
            input_share: 0.6,
        }
    }
}

/// Accumulated usage for one tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierUsage {
    pub consultations: usize,
    pub tokens: usize,
    pub cost: f64,
}

/// Point-in-time view of a cost tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_cost: f64,
    pub average_cost: f64,
    pub consultations: usize,
    pub economy: TierUsage,
    pub premium: TierUsage,
}
