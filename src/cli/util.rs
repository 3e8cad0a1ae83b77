//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::{CacheConfig, CacheStore};
use crate::config::{Config, ConfigLoader};
use crate::types::{ItemKind, ItemSelection, Result, normalize_name};

/// Command execution context
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// Project root directory
    pub project_root: PathBuf,
}

impl CommandContext {
    /// Load configuration for the current directory
    pub fn load() -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = ConfigLoader::load_for(&project_root.join(ConfigLoader::project_dir()))?;
        Ok(Self {
            config,
            project_root,
        })
    }

    /// Cache store for this project; disabled when `no_cache` or by configuration
    pub fn cache_store(&self, no_cache: bool) -> Arc<CacheStore> {
        if no_cache || !self.config.cache.enabled {
            return Arc::new(CacheStore::disabled());
        }
        Arc::new(CacheStore::new(CacheConfig::from_settings(
            &self.config.cache,
            &self.project_root,
        )))
    }

    /// Store over the configured directory, enabled even when caching is turned off
    pub fn maintenance_store(&self) -> CacheStore {
        let mut config = CacheConfig::from_settings(&self.config.cache, &self.project_root);
        config.enabled = true;
        CacheStore::new(config)
    }
}

/// Item names from the command line, e.g. `--skill testing,linting --skill docker`
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SelectionArgs {
    /// Agents to generate (comma-separated or repeated)
    #[arg(long = "agent", value_delimiter = ',')]
    pub agents: Vec<String>,

    /// Skills to generate (comma-separated or repeated)
    #[arg(long = "skill", value_delimiter = ',')]
    pub skills: Vec<String>,

    /// Hooks to generate (comma-separated or repeated)
    #[arg(long = "hook", value_delimiter = ',')]
    pub hooks: Vec<String>,

    /// Generate the project overview document
    #[arg(long)]
    pub overview: bool,
}

impl SelectionArgs {
    pub fn into_selection(self) -> ItemSelection {
        ItemSelection::new()
            .with_agents(self.agents)
            .with_skills(self.skills)
            .with_hooks(self.hooks)
            .with_overview(self.overview)
    }
}

/// File name safe form of an item name
pub fn slug(name: &str) -> String {
    let slug = normalize_name(name);
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug
    }
}

/// Where a generated artifact is written under `out`
pub fn artifact_path(out: &Path, kind: ItemKind, name: &str) -> PathBuf {
    match kind {
        ItemKind::Agent => out.join("agents").join(format!("{}.md", slug(name))),
        ItemKind::Skill => out.join("skills").join(slug(name)).join("SKILL.md"),
        ItemKind::Hook => out.join("hooks").join(format!("{}.md", slug(name))),
        ItemKind::Overview => out.join("OVERVIEW.md"),
    }
}
