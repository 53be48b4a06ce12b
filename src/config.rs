//! Configuration management for IChingSage
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.ichingsage/config.toml

use crate::consultation::OrchestratorConfig;
use crate::cost::{CostConfig, ModelPricing};
use crate::errors::ConsultationError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration for IChingSage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    pub timeout_secs: u64,
}

/// Model routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub economy: String,
    pub premium: String,
    pub selection_threshold: f64,
    pub compression_threshold: f64,
}

/// Dollar rates per 1K tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub economy_input: f64,
    pub economy_output: f64,
    pub premium_input: f64,
    pub premium_output: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: crate::llm::client::DEFAULT_BASE_URL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 12,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            economy: crate::interpretation::selector::DEFAULT_ECONOMY_MODEL.to_string(),
            premium: crate::interpretation::selector::DEFAULT_PREMIUM_MODEL.to_string(),
            selection_threshold: crate::interpretation::selector::DEFAULT_SELECTION_THRESHOLD,
            compression_threshold: 0.6,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        let costs = CostConfig::default();
        Self {
            economy_input: costs.economy.input_per_1k,
            economy_output: costs.economy.output_per_1k,
            premium_input: costs.premium.input_per_1k,
            premium_output: costs.premium.output_per_1k,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: crate::cache::store::DEFAULT_TTL.as_secs(),
            max_entries: crate::cache::store::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the standard location, creating a default file if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".ichingsage").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::errors::Result<()> {
        fn unit_range(name: &str, value: f64) -> crate::errors::Result<()> {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConsultationError::ConfigError(format!(
                    "{} must be between 0.0 and 1.0",
                    name
                )));
            }
            Ok(())
        }

        unit_range("selection_threshold", self.models.selection_threshold)?;
        unit_range("compression_threshold", self.models.compression_threshold)?;

        if self.llm.timeout_secs == 0 {
            return Err(ConsultationError::ConfigError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.cache.max_entries == 0 {
            return Err(ConsultationError::ConfigError(
                "max_entries must be greater than 0".to_string(),
            ));
        }

        let rates = [
            self.pricing.economy_input,
            self.pricing.economy_output,
            self.pricing.premium_input,
            self.pricing.premium_output,
        ];
        if rates.iter().any(|rate| *rate < 0.0) {
            return Err(ConsultationError::ConfigError(
                "prices cannot be negative".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(ConsultationError::ConfigError(format!(
                    "Invalid log level: {}",
                    other
                )))
            }
        }

        Ok(())
    }

    /// API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Pricing table in tracker form
    pub fn cost_config(&self) -> CostConfig {
        CostConfig {
            economy: ModelPricing {
                input_per_1k: self.pricing.economy_input,
                output_per_1k: self.pricing.economy_output,
            },
            premium: ModelPricing {
                input_per_1k: self.pricing.premium_input,
                output_per_1k: self.pricing.premium_output,
            },
            ..CostConfig::default()
        }
    }

    /// Orchestrator settings derived from this configuration
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            llm_timeout: Duration::from_secs(self.llm.timeout_secs),
            compression_threshold: self.models.compression_threshold,
            selection_threshold: self.models.selection_threshold,
            economy_model: self.models.economy.clone(),
            premium_model: self.models.premium.clone(),
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
            cache_max_entries: self.cache.max_entries,
            costs: self.cost_config(),
        }
    }
}
