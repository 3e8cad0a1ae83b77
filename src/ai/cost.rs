//! Dry-Run Cost Estimation
//!
//! Predicts call count, token volume and USD cost for a selection without
//! touching the network or the cache. Tiers are resolved with
//! [`select_tier`](super::tier::select_tier), the same function live dispatch uses.
//!
//! ## Usage
//!
//! ```ignore
//! let estimator = CostEstimator::new(config.pricing.clone(), complexity);
//! let estimate = estimator.estimate(&selection, &policy);
//! println!("{} calls, ${:.4}", estimate.api_call_count, estimate.total_cost);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use super::tier::{ComplexityTable, TierPolicy};
use crate::config::PriceTable;
use crate::constants::tokens;
use crate::types::{GenerationTask, ItemKind, ItemSelection, ModelTier};

/// Typical (input, output) tokens for one item of a kind
pub fn typical_tokens(kind: ItemKind) -> (u64, u64) {
    match kind {
        ItemKind::Agent => (tokens::AGENT_INPUT, tokens::AGENT_OUTPUT),
        ItemKind::Skill => (tokens::SKILL_INPUT, tokens::SKILL_OUTPUT),
        ItemKind::Overview => (tokens::OVERVIEW_INPUT, tokens::OVERVIEW_OUTPUT),
        ItemKind::Hook => (tokens::HOOK_INPUT, tokens::HOOK_OUTPUT),
    }
}

/// One call the batch would make
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedCall {
    pub kind: ItemKind,
    pub name: String,
    pub tier: ModelTier,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
}

/// Aggregate prediction for a selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostEstimate {
    pub api_call_count: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// USD
    pub total_cost: f64,
    pub per_tier_call_counts: BTreeMap<ModelTier, usize>,
}

impl CostEstimate {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Zero-call estimator over static token and price tables
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    prices: PriceTable,
    complexity: ComplexityTable,
}

impl CostEstimator {
    pub fn new(prices: PriceTable, complexity: ComplexityTable) -> Self {
        Self { prices, complexity }
    }

    /// Tasks for a selection, with complexity resolved the same way live runs resolve it
    pub fn tasks(&self, selection: &ItemSelection) -> Vec<GenerationTask> {
        selection.tasks(|kind, name| self.complexity.lookup(kind, name))
    }

    /// Resolved tier and token estimate per item, in request order
    pub fn plan(&self, selection: &ItemSelection, policy: &TierPolicy) -> Vec<PlannedCall> {
        self.tasks(selection)
            .into_iter()
            .map(|task| {
                let tier = policy.select(&task);
                let (input_tokens, output_tokens) = typical_tokens(task.kind);
                PlannedCall {
                    kind: task.kind,
                    name: task.name,
                    tier,
                    input_tokens,
                    output_tokens,
                    cost: self.prices.for_tier(tier).cost(input_tokens, output_tokens),
                }
            })
            .collect()
    }

    pub fn estimate(&self, selection: &ItemSelection, policy: &TierPolicy) -> CostEstimate {
        let mut estimate = CostEstimate::default();
        for call in self.plan(selection, policy) {
            estimate.api_call_count += 1;
            estimate.input_tokens += call.input_tokens;
            estimate.output_tokens += call.output_tokens;
            estimate.total_cost += call.cost;
            *estimate.per_tier_call_counts.entry(call.tier).or_insert(0) += 1;
        }
        estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::tier::select_tier;
    use crate::types::Complexity;
    use proptest::prelude::*;

    fn estimator() -> CostEstimator {
        CostEstimator::default()
    }

    #[test]
    fn test_empty_selection_costs_nothing() {
        let estimate = estimator().estimate(&ItemSelection::new(), &TierPolicy::default());
        assert_eq!(estimate, CostEstimate::default());
    }

    #[test]
    fn test_single_hook_estimate() {
        let selection = ItemSelection::new().with_hooks(["pre-commit"]);
        let estimate = estimator().estimate(&selection, &TierPolicy::default());

        assert_eq!(estimate.api_call_count, 1);
        assert_eq!(estimate.input_tokens, 800);
        assert_eq!(estimate.output_tokens, 600);
        assert_eq!(estimate.per_tier_call_counts.get(&ModelTier::Low), Some(&1));
        // 800 * 1.00 + 600 * 5.00 per million
        assert!((estimate.total_cost - 0.0038).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_selection() {
        let selection = ItemSelection::new()
            .with_agents(["reviewer", "architect"])
            .with_skills(["linting", "testing", "security"])
            .with_overview(true)
            .with_hooks(["pre-commit"]);
        let estimate = estimator().estimate(&selection, &TierPolicy::default());

        assert_eq!(estimate.api_call_count, 7);
        assert_eq!(estimate.input_tokens, 2 * 2500 + 3 * 1800 + 4000 + 800);
        assert_eq!(estimate.output_tokens, 2 * 3000 + 3 * 2000 + 3500 + 600);
        assert_eq!(estimate.per_tier_call_counts[&ModelTier::Low], 2);
        assert_eq!(estimate.per_tier_call_counts[&ModelTier::Mid], 3);
        assert_eq!(estimate.per_tier_call_counts[&ModelTier::High], 2);
        assert_eq!(estimate.total_tokens(), estimate.input_tokens + estimate.output_tokens);
    }

    #[test]
    fn test_plan_follows_request_order() {
        let selection = ItemSelection::new()
            .with_hooks(["pre-push"])
            .with_skills(["docker"])
            .with_agents(["reviewer"]);
        let plan = estimator().plan(&selection, &TierPolicy::default());

        let kinds: Vec<ItemKind> = plan.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ItemKind::Agent, ItemKind::Skill, ItemKind::Hook]);
    }

    #[test]
    fn test_global_choice_moves_overview_only() {
        let selection = ItemSelection::new().with_overview(true).with_hooks(["lint"]);
        let policy = TierPolicy {
            global: Some(ModelTier::High),
            ..TierPolicy::default()
        };
        let plan = estimator().plan(&selection, &policy);
        assert_eq!(plan[0].tier, ModelTier::High);
        assert_eq!(plan[1].tier, ModelTier::Low);
    }

    #[test]
    fn test_custom_prices_are_used() {
        let mut prices = PriceTable::default();
        prices.low.input_per_million = 0.0;
        prices.low.output_per_million = 0.0;
        let estimator = CostEstimator::new(prices, ComplexityTable::default());

        let selection = ItemSelection::new().with_hooks(["lint"]);
        let estimate = estimator.estimate(&selection, &TierPolicy::default());
        assert_eq!(estimate.total_cost, 0.0);
        assert_eq!(estimate.api_call_count, 1);
    }

    fn kind_strategy() -> impl Strategy<Value = ItemKind> {
        prop::sample::select(ItemKind::ALL.to_vec())
    }

    fn complexity_strategy() -> impl Strategy<Value = Option<Complexity>> {
        prop::option::of(prop::sample::select(vec![
            Complexity::Simple,
            Complexity::Moderate,
            Complexity::Complex,
        ]))
    }

    fn tier_strategy() -> impl Strategy<Value = Option<ModelTier>> {
        prop::option::of(prop::sample::select(ModelTier::ALL.to_vec()))
    }

    const SKILL_NAMES: &[&str] = &[
        "linting",
        "testing",
        "security",
        "docker",
        "formatting",
        "architecture",
        "bespoke",
    ];

    proptest! {
        #[test]
        fn prop_plan_tier_matches_select_tier(
            kind in kind_strategy(),
            complexity in complexity_strategy(),
            global in tier_strategy(),
            pin in tier_strategy(),
        ) {
            let mut policy = TierPolicy { global, ..TierPolicy::default() };
            if let Some(pin) = pin {
                policy.pinned.insert(kind, pin);
            }

            let mut overrides = BTreeMap::new();
            if let Some(complexity) = complexity {
                overrides.insert("sample-item".to_string(), complexity);
            }
            let estimator = CostEstimator::new(PriceTable::default(), ComplexityTable::new(overrides));

            let selection = match kind {
                ItemKind::Agent => ItemSelection::new().with_agents(["sample-item"]),
                ItemKind::Skill => ItemSelection::new().with_skills(["sample-item"]),
                ItemKind::Overview => ItemSelection::new().with_overview(true),
                ItemKind::Hook => ItemSelection::new().with_hooks(["sample-item"]),
            };

            let plan = estimator.plan(&selection, &policy);
            prop_assert_eq!(plan.len(), 1);

            let task = &estimator.tasks(&selection)[0];
            prop_assert_eq!(plan[0].tier, select_tier(kind, task.complexity, &policy));
            prop_assert_eq!(plan[0].tier, policy.select(task));
        }

        #[test]
        fn prop_adding_a_skill_never_lowers_the_estimate(
            skills in prop::collection::btree_set(prop::sample::select(SKILL_NAMES.to_vec()), 0..5),
            extra in prop::sample::select(SKILL_NAMES.to_vec()),
            overview in any::<bool>(),
            global in tier_strategy(),
        ) {
            prop_assume!(!skills.contains(&extra));

            let policy = TierPolicy { global, ..TierPolicy::default() };
            let base = ItemSelection::new()
                .with_skills(skills.iter().copied())
                .with_overview(overview);
            let grown = base.clone().with_skills([extra]);

            let before = estimator().estimate(&base, &policy);
            let after = estimator().estimate(&grown, &policy);

            prop_assert_eq!(after.api_call_count, before.api_call_count + 1);
            prop_assert!(after.input_tokens > before.input_tokens);
            prop_assert!(after.output_tokens > before.output_tokens);
            prop_assert!(after.total_cost >= before.total_cost);
        }
    }
}
