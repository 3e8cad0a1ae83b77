//! Estimate Command
//!
//! Dry-run preview of calls, tokens and cost for a selection. Makes no
//! external calls and does not read the cache, so the figures are an upper
//! bound for a cold cache.

use console::{Alignment, pad_str};
use serde::Serialize;

use crate::ai::{ComplexityTable, CostEstimate, CostEstimator, PlannedCall, TierPolicy};
use crate::cli::ui::{Output, tier_label};
use crate::cli::util::CommandContext;
use crate::types::{ItemSelection, ModelTier, Result};

#[derive(Serialize)]
struct EstimateReport {
    calls: Vec<PlannedCall>,
    estimate: CostEstimate,
}

pub fn run(selection: ItemSelection, tier: Option<ModelTier>, format: &str) -> Result<()> {
    selection.validate()?;
    let ctx = CommandContext::load()?;
    let config = &ctx.config;

    let policy = TierPolicy::from_settings(&config.generation).with_global(tier);
    let estimator = CostEstimator::new(
        config.pricing.clone(),
        ComplexityTable::new(config.generation.skill_complexity.clone()),
    );

    let calls = estimator.plan(&selection, &policy);
    let estimate = estimator.estimate(&selection, &policy);

    if format == "json" {
        let report = EstimateReport { calls, estimate };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let out = Output::new();
    out.header("Cost estimate");
    for call in &calls {
        println!(
            "  {:<28} {} {:>6} in {:>6} out  ${:.4}",
            format!("{}:{}", call.kind, call.name),
            pad_str(&tier_label(call.tier), 6, Alignment::Left, None),
            call.input_tokens,
            call.output_tokens,
            call.cost
        );
    }

    out.section("Total");
    out.field("Calls", estimate.api_call_count);
    for (tier, count) in &estimate.per_tier_call_counts {
        out.field(&format!("  {}", tier), count);
    }
    out.field("Input tokens", estimate.input_tokens);
    out.field("Output tokens", estimate.output_tokens);
    out.field("Cost (USD)", format!("${:.4}", estimate.total_cost));
    println!();
    out.info("Cached items are not called; a warm cache costs less.");

    Ok(())
}
