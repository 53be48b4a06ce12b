//! Complexity-based model routing
//!
//! Two cost tiers. Below the threshold the economy model answers; at or
//! above it the premium model does.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default economy model id
pub const DEFAULT_ECONOMY_MODEL: &str = "gpt-3.5-turbo";

/// Default premium model id
pub const DEFAULT_PREMIUM_MODEL: &str = "gpt-4-turbo";

/// Default routing threshold
pub const DEFAULT_SELECTION_THRESHOLD: f64 = 0.6;

/// Cost tier of an interpretation model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    Economy,
    Premium,
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::Economy => write!(f, "economy"),
            ModelTier::Premium => write!(f, "premium"),
        }
    }
}

/// A routing decision: tier plus the concrete model id to call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelChoice {
    pub tier: ModelTier,
    pub model: String,
}

/// Threshold-based model selector
#[derive(Debug, Clone)]
pub struct ModelSelector {
    threshold: f64,
    economy_model: String,
    premium_model: String,
}

impl ModelSelector {
    /// Create selector with default models and threshold
    pub fn new() -> Self {
        Self::with_models(
            DEFAULT_SELECTION_THRESHOLD,
            DEFAULT_ECONOMY_MODEL,
            DEFAULT_PREMIUM_MODEL,
        )
    }

    /// Create selector with custom models and threshold
    pub fn with_models(threshold: f64, economy_model: &str, premium_model: &str) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            economy_model: economy_model.to_string(),
            premium_model: premium_model.to_string(),
        }
    }

    /// Map a complexity score to a tier
    pub fn select(&self, complexity: f64) -> ModelTier {
        if complexity < self.threshold {
            ModelTier::Economy
        } else {
            ModelTier::Premium
        }
    }

    /// Model id configured for a tier
    pub fn model_id(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Economy => &self.economy_model,
            ModelTier::Premium => &self.premium_model,
        }
    }

    /// Tier and model id in one step
    pub fn choose(&self, complexity: f64) -> ModelChoice {
        let tier = self.select(complexity);
        ModelChoice {
            tier,
            model: self.model_id(tier).to_string(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self::new()
    }
}
