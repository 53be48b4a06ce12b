//! Model usage cost tracking
//! Converts token usage into dollars per model tier

pub mod tracker;
pub mod types;

pub use tracker::CostTracker;
pub use types::{CostConfig, CostSummary, ModelPricing, TierUsage};
