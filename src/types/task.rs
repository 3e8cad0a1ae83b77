//! Generation task vocabulary: item kinds, complexity, tiers and selections.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{CrewError, Result, ValidationError, ValidationErrorKind};

/// Kind of artifact a task produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Agent,
    Skill,
    Overview,
    Hook,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [Self::Agent, Self::Skill, Self::Overview, Self::Hook];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Skill => "skill",
            Self::Overview => "overview",
            Self::Hook => "hook",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rough difficulty of producing an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "moderate" => Ok(Self::Moderate),
            "complex" => Ok(Self::Complex),
            _ => Err(format!(
                "Unknown complexity: {}. Valid values: simple, moderate, complex",
                s
            )),
        }
    }
}

/// Quality/cost level of an external generation call. Ordered low < mid < high.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Low,
    #[default]
    Mid,
    High,
}

impl ModelTier {
    pub const ALL: [ModelTier; 3] = [Self::Low, Self::Mid, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" | "haiku" => Ok(Self::Low),
            "mid" | "sonnet" => Ok(Self::Mid),
            "high" | "opus" => Ok(Self::High),
            _ => Err(format!(
                "Unknown model tier: {}. Valid values: low, mid, high",
                s
            )),
        }
    }
}

/// One unit of generation work
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenerationTask {
    pub kind: ItemKind,
    pub name: String,
    pub complexity: Option<Complexity>,
}

impl GenerationTask {
    pub fn new(kind: ItemKind, name: impl Into<String>, complexity: Option<Complexity>) -> Self {
        Self {
            kind,
            name: name.into(),
            complexity,
        }
    }

    /// Display label, e.g. `skill:testing`
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.name)
    }
}

impl fmt::Display for GenerationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// Name under which the single overview document is keyed
pub const OVERVIEW_NAME: &str = "overview";

/// Canonical form of an item name: lowercase ASCII letters, digits, `-` and `_`,
/// with every other run of characters collapsed to one `-`.
///
/// Two names with the same canonical form are the same item and land in the same file.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            normalized.push(c.to_ascii_lowercase());
        } else if !normalized.ends_with('-') {
            normalized.push('-');
        }
    }
    normalized.trim_matches('-').to_string()
}

/// Items requested for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSelection {
    pub agents: Vec<String>,
    pub skills: Vec<String>,
    pub hooks: Vec<String>,
    pub overview: bool,
}

impl ItemSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agents<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.agents.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_skills<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_hooks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hooks.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_overview(mut self, overview: bool) -> Self {
        self.overview = overview;
        self
    }

    pub fn len(&self) -> usize {
        self.agents.len() + self.skills.len() + self.hooks.len() + usize::from(self.overview)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject blank and duplicate names
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(CrewError::Validation(ValidationError::new(
                ValidationErrorKind::EmptySelection,
                "no agents, skills, hooks or overview selected",
            )));
        }

        for (kind, names) in [
            (ItemKind::Agent, &self.agents),
            (ItemKind::Skill, &self.skills),
            (ItemKind::Hook, &self.hooks),
        ] {
            let mut seen = HashSet::new();
            for name in names {
                let trimmed = name.trim();
                let normalized = normalize_name(trimmed);
                if normalized.is_empty() {
                    return Err(CrewError::missing(
                        kind.as_str(),
                        format!("{} name '{}' has no letters or digits", kind, trimmed),
                    ));
                }
                if !seen.insert(normalized) {
                    return Err(CrewError::Validation(
                        ValidationError::new(
                            ValidationErrorKind::Duplicate,
                            format!("{} '{}' requested more than once", kind, trimmed),
                        )
                        .with_field(kind.as_str()),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Expand into tasks in request order: agents, skills, overview, hooks.
    ///
    /// `complexity_of` resolves a complexity per (kind, name).
    pub fn tasks<F>(&self, complexity_of: F) -> Vec<GenerationTask>
    where
        F: Fn(ItemKind, &str) -> Option<Complexity>,
    {
        let mut tasks = Vec::with_capacity(self.len());
        for name in &self.agents {
            let name = name.trim();
            tasks.push(GenerationTask::new(
                ItemKind::Agent,
                name,
                complexity_of(ItemKind::Agent, name),
            ));
        }
        for name in &self.skills {
            let name = name.trim();
            tasks.push(GenerationTask::new(
                ItemKind::Skill,
                name,
                complexity_of(ItemKind::Skill, name),
            ));
        }
        if self.overview {
            tasks.push(GenerationTask::new(ItemKind::Overview, OVERVIEW_NAME, None));
        }
        for name in &self.hooks {
            let name = name.trim();
            tasks.push(GenerationTask::new(
                ItemKind::Hook,
                name,
                complexity_of(ItemKind::Hook, name),
            ));
        }
        tasks
    }
}
