//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/crewgen/) and project (.crewgen/) level configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{cache as cache_constants, dispatch, network, pricing};
use crate::types::{Complexity, CrewError, ItemKind, ModelTier, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache location and lifetimes
    pub cache: CacheSettings,

    /// Batch dispatch and tier policy
    pub generation: GenerationSettings,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Per-tier price table
    pub pricing: PriceTable,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `CrewError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let concurrency = self.generation.concurrency;
        if concurrency == 0 || concurrency > dispatch::MAX_CONCURRENCY {
            return Err(CrewError::Config(format!(
                "generation.concurrency must be between 1 and {}, got {}",
                dispatch::MAX_CONCURRENCY,
                concurrency
            )));
        }

        if self.cache.analysis_ttl_secs == 0 || self.cache.generation_ttl_secs == 0 {
            return Err(CrewError::Config(
                "cache TTLs must be greater than 0".to_string(),
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err(CrewError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(CrewError::Config(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        self.pricing.validate()?;

        Ok(())
    }
}

// =============================================================================
// Cache
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Disable to force every read to miss and every write to be skipped
    pub enabled: bool,

    /// Cache directory (relative paths resolve against the project root)
    pub dir: PathBuf,

    /// Lifetime of analysis entries
    pub analysis_ttl_secs: u64,

    /// Lifetime of generated artifacts
    pub generation_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(cache_constants::DEFAULT_DIR),
            analysis_ttl_secs: cache_constants::ANALYSIS_TTL_SECS,
            generation_ttl_secs: cache_constants::GENERATION_TTL_SECS,
        }
    }
}

// =============================================================================
// Generation
// =============================================================================

/// What a batch does when one item fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Attempt every item and report failures alongside results
    #[default]
    Collect,
    /// Stop scheduling on the first failure and return it
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Maximum generation calls in flight
    pub concurrency: usize,

    pub failure_mode: FailureMode,

    /// Tier used when no other rule applies
    pub default_tier: ModelTier,

    /// User's global model choice (honored verbatim by the overview document)
    pub tier: Option<ModelTier>,

    /// Per-kind pins, e.g. `agent = "high"`
    pub pinned: BTreeMap<ItemKind, ModelTier>,

    /// Per-skill complexity overrides, merged over the built-in table
    pub skill_complexity: BTreeMap<String, Complexity>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            concurrency: dispatch::DEFAULT_CONCURRENCY,
            failure_mode: FailureMode::Collect,
            default_tier: ModelTier::Mid,
            tier: None,
            pinned: BTreeMap::new(),
            skill_complexity: BTreeMap::new(),
        }
    }
}

// =============================================================================
// LLM
// =============================================================================

/// Model name per tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierModels {
    pub low: String,
    pub mid: String,
    pub high: String,
}

impl Default for TierModels {
    fn default() -> Self {
        Self {
            low: "claude-haiku-4-5".to_string(),
            mid: "claude-sonnet-4-5".to_string(),
            high: "claude-opus-4-1".to_string(),
        }
    }
}

impl TierModels {
    pub fn for_tier(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Low => &self.low,
            ModelTier::Mid => &self.mid,
            ModelTier::High => &self.high,
        }
    }
}

/// LLM provider configuration
///
/// The API key is never serialized and is redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type: "claude-code", "openai"
    pub provider: String,

    pub models: TierModels,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub temperature: f32,

    pub max_tokens: usize,

    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("models", &self.models)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "claude-code".to_string(),
            models: TierModels::default(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
            max_tokens: network::DEFAULT_MAX_TOKENS,
            api_key: None,
            api_base: None,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPrice {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl TierPrice {
    pub const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    /// Cost in USD of one call with the given token counts
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 * self.input_per_million
            + output_tokens as f64 * self.output_per_million)
            / 1_000_000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    pub low: TierPrice,
    pub mid: TierPrice,
    pub high: TierPrice,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            low: TierPrice::new(pricing::LOW_INPUT, pricing::LOW_OUTPUT),
            mid: TierPrice::new(pricing::MID_INPUT, pricing::MID_OUTPUT),
            high: TierPrice::new(pricing::HIGH_INPUT, pricing::HIGH_OUTPUT),
        }
    }
}

impl PriceTable {
    pub fn for_tier(&self, tier: ModelTier) -> TierPrice {
        match tier {
            ModelTier::Low => self.low,
            ModelTier::Mid => self.mid,
            ModelTier::High => self.high,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for tier in ModelTier::ALL {
            let price = self.for_tier(tier);
            for value in [price.input_per_million, price.output_per_million] {
                if !value.is_finite() || value < 0.0 {
                    return Err(CrewError::Config(format!(
                        "pricing.{} must be a non-negative number, got {}",
                        tier, value
                    )));
                }
            }
        }
        Ok(())
    }
}
