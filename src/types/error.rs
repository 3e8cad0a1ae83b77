//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Fault Taxonomy
//!
//! - **Validation**: malformed input to an entry point (surfaced immediately)
//! - **Config**: invalid configuration (fails before any work is scheduled)
//! - **Generation**: one item's external call failed (per-item data, or batch error in strict mode)
//! - Cache faults never appear here; they are absorbed inside [`crate::cache`]
//!
//! Provider failures are classified into an [`ErrorCategory`] so callers can
//! tell rate limits and outages apart from bad requests.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories for provider failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Context/token limit exceeded
    TokenLimit,
    /// Authentication failed - don't retry
    Auth,
    /// Network/connectivity issues, including timeouts
    Network,
    /// Provider unavailable or not installed
    Unavailable,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::TokenLimit => write!(f, "TOKEN_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if re-running the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Transient)
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Provider error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider output onto an [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any provider
    pub fn classify(message: &str, provider: &str) -> LlmError {
        let lower = message.to_lowercase();

        let category = if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota exceeded")
        {
            ErrorCategory::RateLimit
        } else if lower.contains("context length")
            || lower.contains("too large")
            || (lower.contains("token") && lower.contains("exceed"))
        {
            ErrorCategory::TokenLimit
        } else if lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("authentication")
        {
            ErrorCategory::Auth
        } else if lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("dns")
        {
            ErrorCategory::Network
        } else if lower.contains("503")
            || lower.contains("502")
            || lower.contains("service unavailable")
            || lower.contains("not installed")
            || lower.contains("not found")
        {
            ErrorCategory::Unavailable
        } else if lower.contains("400") || lower.contains("bad request") || lower.contains("invalid")
        {
            ErrorCategory::BadRequest
        } else if lower.contains("overloaded")
            || lower.contains("temporary")
            || lower.contains("non-zero status")
            || lower.contains("500")
        {
            ErrorCategory::Transient
        } else {
            ErrorCategory::Unknown
        };

        LlmError::with_provider(category, message, provider)
    }

    /// Classify an HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 | 529 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field or component that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required value missing or blank
    MissingField,
    /// Same item requested twice
    Duplicate,
    /// Nothing to do
    EmptySelection,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structured provider error
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Failure of a single item's external generation call
    #[error("Generation failed for {item}: {source}")]
    Generation {
        item: String,
        #[source]
        source: LlmError,
    },

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("{0}")]
    Validation(ValidationError),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<LlmError> for CrewError {
    fn from(err: LlmError) -> Self {
        CrewError::Llm(err)
    }
}

impl From<ValidationError> for CrewError {
    fn from(err: ValidationError) -> Self {
        CrewError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, CrewError>;

impl CrewError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a validation error for a blank or missing field
    pub fn missing(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(
            ValidationError::new(ValidationErrorKind::MissingField, message).with_field(field),
        )
    }

    /// Flatten any error into the structured form carried by a failed item
    pub fn into_llm_error(self, provider: &str) -> LlmError {
        match self {
            Self::Llm(e) | Self::Generation { source: e, .. } => e,
            Self::Timeout { .. } => {
                LlmError::with_provider(ErrorCategory::Network, self.to_string(), provider)
            }
            Self::Io(_) => {
                LlmError::with_provider(ErrorCategory::Unavailable, self.to_string(), provider)
            }
            Self::Config(_) | Self::Validation(_) => {
                LlmError::with_provider(ErrorCategory::BadRequest, self.to_string(), provider)
            }
            Self::Json(_) => {
                LlmError::with_provider(ErrorCategory::Unknown, self.to_string(), provider)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
