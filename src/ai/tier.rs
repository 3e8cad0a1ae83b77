//! Model Tier Selection
//!
//! One pure function decides which quality/cost tier an item is generated at.
//! Both the live orchestrator and the dry-run estimator call [`select_tier`],
//! so a preview can never disagree with what actually runs.
//!
//! Priority:
//! 1. The user's global choice for the overview document, then a per-kind pin
//! 2. Kind rules: hooks low, skills by complexity, agents mid or above
//! 3. The policy default

use std::collections::BTreeMap;

use crate::config::GenerationSettings;
use crate::types::{Complexity, GenerationTask, ItemKind, ModelTier};

/// Inputs to tier selection that come from the user or configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierPolicy {
    /// Global model choice
    pub global: Option<ModelTier>,
    /// Tiers pinned per item kind
    pub pinned: BTreeMap<ItemKind, ModelTier>,
    /// Fallback when no rule applies
    pub default: ModelTier,
}

impl TierPolicy {
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        Self {
            global: settings.tier,
            pinned: settings.pinned.clone(),
            default: settings.default_tier,
        }
    }

    /// Replace the global choice (CLI `--tier`)
    pub fn with_global(mut self, global: Option<ModelTier>) -> Self {
        if global.is_some() {
            self.global = global;
        }
        self
    }

    pub fn select(&self, task: &GenerationTask) -> ModelTier {
        select_tier(task.kind, task.complexity, self)
    }
}

/// Decide the tier for one item. No I/O, no side effects.
pub fn select_tier(kind: ItemKind, complexity: Option<Complexity>, policy: &TierPolicy) -> ModelTier {
    if kind == ItemKind::Overview
        && let Some(global) = policy.global
    {
        return global;
    }
    if let Some(pinned) = policy.pinned.get(&kind) {
        return *pinned;
    }

    match kind {
        ItemKind::Overview => policy.default,
        ItemKind::Hook => ModelTier::Low,
        ItemKind::Skill => match complexity {
            Some(Complexity::Simple) => ModelTier::Low,
            Some(Complexity::Complex) => ModelTier::High,
            Some(Complexity::Moderate) | None => ModelTier::Mid,
        },
        ItemKind::Agent => match complexity {
            Some(Complexity::Complex) => ModelTier::High,
            _ => ModelTier::Mid,
        },
    }
}

/// Built-in complexity of conventional skill names
const SKILL_COMPLEXITY: &[(&str, Complexity)] = &[
    ("formatting", Complexity::Simple),
    ("linting", Complexity::Simple),
    ("git-workflow", Complexity::Simple),
    ("commit-messages", Complexity::Simple),
    ("documentation", Complexity::Simple),
    ("changelog", Complexity::Simple),
    ("testing", Complexity::Moderate),
    ("api-design", Complexity::Moderate),
    ("database", Complexity::Moderate),
    ("frontend", Complexity::Moderate),
    ("ci-cd", Complexity::Moderate),
    ("docker", Complexity::Moderate),
    ("error-handling", Complexity::Moderate),
    ("architecture", Complexity::Complex),
    ("security", Complexity::Complex),
    ("performance", Complexity::Complex),
    ("migration", Complexity::Complex),
    ("concurrency", Complexity::Complex),
    ("data-pipeline", Complexity::Complex),
];

/// Agents whose role needs the strongest reasoning
const COMPLEX_AGENTS: &[&str] = &["architect", "security-auditor", "tech-lead", "planner"];

/// Per-name complexity lookup: configuration overrides first, then the built-in table
#[derive(Debug, Clone, Default)]
pub struct ComplexityTable {
    overrides: BTreeMap<String, Complexity>,
}

impl ComplexityTable {
    pub fn new(overrides: BTreeMap<String, Complexity>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(name, complexity)| (name.trim().to_lowercase(), complexity))
            .collect();
        Self { overrides }
    }

    pub fn lookup(&self, kind: ItemKind, name: &str) -> Option<Complexity> {
        let name = name.trim().to_lowercase();
        match kind {
            ItemKind::Skill => self.overrides.get(&name).copied().or_else(|| {
                SKILL_COMPLEXITY
                    .iter()
                    .find(|(skill, _)| *skill == name)
                    .map(|(_, complexity)| *complexity)
            }),
            ItemKind::Agent => COMPLEX_AGENTS
                .contains(&name.as_str())
                .then_some(Complexity::Complex),
            ItemKind::Overview | ItemKind::Hook => None,
        }
    }
}
