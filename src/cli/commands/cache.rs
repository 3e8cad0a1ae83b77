//! Cache Command
//!
//! Usage:
//!   crewgen cache stats
//!   crewgen cache clear
//!   crewgen cache prune

use crate::cli::ui::{Output, format_bytes};
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn stats() -> Result<()> {
    let ctx = CommandContext::load()?;
    let cache = ctx.cache_store(false);
    let out = Output::new();

    if !cache.config().enabled {
        out.warning("Cache is disabled (cache.enabled = false)");
        return Ok(());
    }

    let stats = cache.stats().await;
    out.section("Cache");
    out.field("Directory", cache.config().dir.display());
    out.field("Analyses", stats.analysis_count);
    out.field("Generations", stats.generation_count);
    out.field("Size", format_bytes(stats.total_size_bytes));
    Ok(())
}

pub async fn clear() -> Result<()> {
    let ctx = CommandContext::load()?;
    let cache = ctx.maintenance_store();
    let out = Output::new();

    let stats = cache.stats().await;
    cache.clear().await?;
    out.success(&format!(
        "Cleared {} analyses and {} generations ({})",
        stats.analysis_count,
        stats.generation_count,
        format_bytes(stats.total_size_bytes)
    ));
    Ok(())
}

pub async fn prune() -> Result<()> {
    let ctx = CommandContext::load()?;
    let cache = ctx.maintenance_store();

    let removed = cache.prune().await;
    Output::new().success(&format!("Removed {} stale entries", removed));
    Ok(())
}
