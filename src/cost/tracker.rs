//! Dollar cost accumulator for model calls
//!
//! Formula per call:
//!
//! ```text
//! cost = 0.6 × tokens / 1000 × input_rate + 0.4 × tokens / 1000 × output_rate
//! ```
//!
//! Average cost is `total / count`, and 0.0 when nothing has been recorded.

use crate::cost::types::{CostConfig, CostSummary, TierUsage};
use crate::interpretation::ModelTier;

/// Running cost totals
#[derive(Debug, Clone)]
pub struct CostTracker {
    /// Pricing configuration
    config: CostConfig,

    /// Running dollar total
    total_cost: f64,

    /// Number of recorded consultations
    consultations: usize,

    economy: TierUsage,
    premium: TierUsage,
}

impl CostTracker {
    /// Create tracker with default pricing
    pub fn new() -> Self {
        Self::with_config(CostConfig::default())
    }

    /// Create tracker with custom pricing
    pub fn with_config(config: CostConfig) -> Self {
        Self {
            config,
            total_cost: 0.0,
            consultations: 0,
            economy: TierUsage::default(),
            premium: TierUsage::default(),
        }
    }

    /// Record one model call; returns the dollar cost added
    pub fn add_cost(&mut self, token_count: usize, tier: ModelTier) -> f64 {
        let cost = self
            .config
            .pricing(tier)
            .cost(token_count, self.config.input_share);

        self.total_cost += cost;
        self.consultations += 1;

        let usage = match tier {
            ModelTier::Economy => &mut self.economy,
            ModelTier::Premium => &mut self.premium,
        };
        usage.consultations += 1;
        usage.tokens += token_count;
        usage.cost += cost;

        cost
    }

    pub fn get_total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Mean cost per recorded consultation
    pub fn get_average_cost(&self) -> f64 {
        if self.consultations == 0 {
            return 0.0;
        }
        self.total_cost / self.consultations as f64
    }

    pub fn get_consultation_count(&self) -> usize {
        self.consultations
    }

    pub fn tier_usage(&self, tier: ModelTier) -> TierUsage {
        match tier {
            ModelTier::Economy => self.economy,
            ModelTier::Premium => self.premium,
        }
    }

    /// Zero every counter
    pub fn reset(&mut self) {
        self.total_cost = 0.0;
        self.consultations = 0;
        self.economy = TierUsage::default();
        self.premium = TierUsage::default();
    }

    pub fn summary(&self) -> CostSummary {
        CostSummary {
            total_cost: self.total_cost,
            average_cost: self.get_average_cost(),
            consultations: self.consultations,
            economy: self.economy,
            premium: self.premium,
        }
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }
}

impl Default for CostTracker {
    fn default() -> Self {
        Self::new()
    }
}
