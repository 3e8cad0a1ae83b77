pub mod analysis;
pub mod error;
pub mod task;

pub use analysis::ProjectAnalysis;
pub use error::{
    CrewError, ErrorCategory, ErrorClassifier, LlmError, Result, ValidationError,
    ValidationErrorKind,
};
pub use task::{
    Complexity, GenerationTask, ItemKind, ItemSelection, ModelTier, OVERVIEW_NAME,
    normalize_name,
};
