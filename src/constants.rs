//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Cache constants
pub mod cache {
    /// Current on-disk schema version. Entries written under any other version are misses.
    pub const SCHEMA_VERSION: &str = "1";

    /// Analysis namespace TTL (seconds). Project state changes often.
    pub const ANALYSIS_TTL_SECS: u64 = 60 * 60;

    /// Generation namespace TTL (seconds). 7 days.
    pub const GENERATION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

    /// Default cache directory, relative to the project root
    pub const DEFAULT_DIR: &str = ".crewgen/cache";

    /// Namespace directory for analysis envelopes
    pub const ANALYSIS_DIR: &str = "analysis";

    /// Namespace directory for generated text and its metadata
    pub const GENERATION_DIR: &str = "generation";

    /// Suffix of generation metadata files
    pub const META_SUFFIX: &str = ".meta.json";

    /// Suffix of generation body files
    pub const BODY_SUFFIX: &str = ".md";
}

/// Project fingerprint inputs
pub mod fingerprint {
    /// Manifest and lock files hashed by content, in this order
    pub const MANIFEST_FILES: &[&str] = &[
        "package.json",
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "bun.lockb",
        "Cargo.toml",
        "Cargo.lock",
        "go.mod",
        "go.sum",
        "pyproject.toml",
        "requirements.txt",
        "poetry.lock",
        "Pipfile.lock",
        "Gemfile",
        "Gemfile.lock",
        "composer.json",
        "composer.lock",
        "pom.xml",
        "build.gradle",
    ];

    /// Conventional source directories, checked in order
    pub const SOURCE_DIRS: &[&str] = &["src", "lib", "app", "packages"];

    /// Maximum number of source directories included in the structural hash
    pub const MAX_SOURCE_DIRS: usize = 2;

    /// Build and dependency directories never walked
    pub const SKIP_DIRS: &[&str] = &[
        "node_modules",
        "target",
        "dist",
        "build",
        "vendor",
        "__pycache__",
        ".venv",
        "venv",
        "coverage",
        "out",
    ];
}

/// Dispatch constants
pub mod dispatch {
    /// Default number of generation calls in flight
    pub const DEFAULT_CONCURRENCY: usize = 3;

    /// Upper bound accepted from configuration
    pub const MAX_CONCURRENCY: usize = 16;
}

/// Typical token usage per item kind, used by the dry-run estimator
pub mod tokens {
    pub const AGENT_INPUT: u64 = 2_500;
    pub const AGENT_OUTPUT: u64 = 3_000;

    pub const SKILL_INPUT: u64 = 1_800;
    pub const SKILL_OUTPUT: u64 = 2_000;

    pub const OVERVIEW_INPUT: u64 = 4_000;
    pub const OVERVIEW_OUTPUT: u64 = 3_500;

    pub const HOOK_INPUT: u64 = 800;
    pub const HOOK_OUTPUT: u64 = 600;
}

/// Default prices in USD per million tokens
pub mod pricing {
    pub const LOW_INPUT: f64 = 1.0;
    pub const LOW_OUTPUT: f64 = 5.0;

    pub const MID_INPUT: f64 = 3.0;
    pub const MID_OUTPUT: f64 = 15.0;

    pub const HIGH_INPUT: f64 = 15.0;
    pub const HIGH_OUTPUT: f64 = 75.0;
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Default maximum output tokens per generation
    pub const DEFAULT_MAX_TOKENS: usize = 8192;
}
