//! crewgen - Crew Generator for AI Coding Assistants
//!
//! Analyzes a project, then generates agents, skills, hooks and an overview
//! document with a language model, keeping the expensive parts cached.
//!
//! ## Core Features
//!
//! - **Two-Namespace Cache**: versioned, TTL-bounded analysis and generation entries
//! - **Bounded Dispatch**: concurrent model calls with strict or collecting failure modes
//! - **Tier Selection**: cheapest adequate model per item
//! - **Cost Estimation**: call counts, tokens and price before any call is made
//!
//! ## Quick Start
//!
//! ```ignore
//! use crewgen::{CacheStore, GenerationOrchestrator, ItemSelection};
//!
//! let cache = Arc::new(CacheStore::new(CacheConfig::at(".crewgen/cache")));
//! let orchestrator = GenerationOrchestrator::new(cache, provider);
//! let selection = ItemSelection::new().with_skills(["testing"]).with_overview(true);
//! let result = orchestrator
//!     .run_generation_batch("ship a CLI", &fingerprint, &selection)
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`cache`]: envelopes, validation gates, fingerprints and the store
//! - [`dispatch`]: bounded concurrent execution
//! - [`ai`]: providers, tier selection and cost estimation
//! - [`generation`]: batch orchestration
//! - [`analyzer`]: manifest based project detection

pub mod ai;
pub mod analyzer;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod generation;
pub mod types;

// Configuration
pub use config::{Config, ConfigLoader, FailureMode};

// Error Types
pub use types::error::{CrewError, ErrorCategory, LlmError, Result};

// Domain
pub use types::{GenerationTask, ItemKind, ItemSelection, ModelTier, ProjectAnalysis};

// Cache
pub use cache::{CacheConfig, CacheStats, CacheStore, GenerationKey, compute_project_fingerprint};

// Dispatch
pub use dispatch::{Collected, Dispatcher, ItemFailure};

// AI
pub use ai::{
    CostEstimate, CostEstimator, LlmProvider, LlmResponse, SharedProvider, TierPolicy,
    create_provider, select_tier, with_timeout,
};

// Generation
pub use generation::{BatchResult, GenerationOrchestrator, ProgressEvent};
