//! Generate Command
//!
//! Fingerprints the project, loads (or detects and caches) its analysis, runs
//! one generation batch and writes the artifacts to the output directory.
//!
//! Usage:
//!   crewgen generate "goal" --agent reviewer --skill testing,docker --overview
//!   crewgen generate "goal" --hook pre-commit --strict --concurrency 4

use std::path::PathBuf;
use std::sync::Arc;

use console::style;

use crate::ai::create_provider;
use crate::analyzer::{ManifestDetector, analyze_with_cache};
use crate::cli::ui::{Output, tier_label};
use crate::cli::util::{CommandContext, artifact_path};
use crate::config::FailureMode;
use crate::generation::{BatchResult, GenerationOrchestrator, ItemSource, ProgressEvent};
use crate::types::{ItemSelection, ModelTier, Result};

/// Options for one `generate` run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub goal: String,
    pub selection: ItemSelection,
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub concurrency: Option<usize>,
    pub tier: Option<ModelTier>,
    pub no_cache: bool,
}

const DEFAULT_OUTPUT: &str = ".crewgen/output";

pub async fn run(options: GenerateOptions) -> Result<BatchResult> {
    let out = Output::new();
    let mut ctx = CommandContext::load()?;

    if let Some(concurrency) = options.concurrency {
        ctx.config.generation.concurrency = concurrency;
    }
    if options.strict {
        ctx.config.generation.failure_mode = FailureMode::Strict;
    }
    if options.tier.is_some() {
        ctx.config.generation.tier = options.tier;
    }
    ctx.config.validate()?;
    options.selection.validate()?;

    let cache = ctx.cache_store(options.no_cache);
    let provider = create_provider(&ctx.config.llm)?;

    let analysis = analyze_with_cache(&cache, &ManifestDetector, &ctx.project_root).await?;
    out.info(&format!(
        "Project: {} ({}){}",
        analysis.analysis.project_type,
        &analysis.fingerprint[..12.min(analysis.fingerprint.len())],
        if analysis.from_cache { ", cached analysis" } else { "" }
    ));

    let orchestrator =
        GenerationOrchestrator::from_config(&ctx.config, Arc::clone(&cache), provider)?
            .with_context(analysis.analysis)
            .with_progress(Arc::new(print_progress));

    let result = orchestrator
        .run_generation_batch(&options.goal, &analysis.fingerprint, &options.selection)
        .await?;

    let output_dir = options
        .output
        .unwrap_or_else(|| ctx.project_root.join(DEFAULT_OUTPUT));
    for item in &result.completed {
        let path = artifact_path(&output_dir, item.kind, &item.name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &item.content).await?;
    }

    print_summary(&out, &result, &output_dir);
    Ok(result)
}

fn print_progress(event: &ProgressEvent) {
    match event {
        ProgressEvent::CacheHit { label, tier } => {
            println!(
                "  {} {} ({}, cached)",
                style("●").cyan(),
                label,
                tier_label(*tier)
            );
        }
        ProgressEvent::Generated {
            label,
            tier,
            completed,
            total,
        } => {
            println!(
                "  {} [{}/{}] {} ({})",
                style("✓").green(),
                completed,
                total,
                label,
                tier_label(*tier)
            );
        }
        ProgressEvent::Failed {
            label,
            error,
            completed,
            total,
        } => {
            println!(
                "  {} [{}/{}] {}: {}",
                style("✗").red(),
                completed,
                total,
                label,
                style(error).dim()
            );
        }
    }
}

fn print_summary(out: &Output, result: &BatchResult, output_dir: &std::path::Path) {
    out.section("Summary");
    let fresh = result
        .completed
        .iter()
        .filter(|item| item.source == ItemSource::Fresh)
        .count();
    out.field("Generated", fresh);
    out.field("From cache", result.cache_hits);
    out.field("Failed", result.failed.len());
    out.field(
        "Tokens",
        format!(
            "{} in / {} out",
            result.usage.input_tokens, result.usage.output_tokens
        ),
    );
    if result.cost_usd > 0.0 {
        out.field("Cost (USD)", format!("${:.4}", result.cost_usd));
    }
    out.field("Output", output_dir.display());

    for failed in &result.failed {
        out.error(&format!("{}: {}", failed.label(), failed.error));
        if failed.error.is_retryable() {
            out.info("  retryable; run again to generate the remaining items");
        }
    }
    if result.is_success() {
        out.success("All items generated");
    }
}
