//! AI Integration Layer
//!
//! LLM providers, tier selection and dry-run cost estimation.

pub mod cost;
pub mod provider;
pub mod tier;
pub mod timeout;

pub use cost::{CostEstimate, CostEstimator, PlannedCall, typical_tokens};
pub use provider::{
    ClaudeCodeProvider, ErrorCategory, ErrorClassifier, GenerationRequest, LlmError, LlmProvider,
    LlmResponse, OpenAiProvider, ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage,
    create_provider,
};
pub use tier::{ComplexityTable, TierPolicy, select_tier};
pub use timeout::with_timeout;
