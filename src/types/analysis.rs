use serde::{Deserialize, Serialize};

/// Detected project characteristics, as produced by a [`crate::analyzer::ProjectDetector`].
///
/// Plain data: the cache stores it, prompts read it, nothing interprets it further.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    /// Coarse project type, e.g. `rust`, `node`, `python`
    pub project_type: String,
    /// Manifest files found at the root
    #[serde(default)]
    pub manifests: Vec<String>,
    /// Declared dependency names
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Recognized conventions and frameworks
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Conventional source directories present
    #[serde(default)]
    pub source_dirs: Vec<String>,
}
