//! Prompts for generated artifacts.
//!
//! Each item kind gets a fixed system prompt; the user prompt carries the goal,
//! the item name and a short project summary when one is available.

use crate::ai::GenerationRequest;
use crate::types::{GenerationTask, ItemKind, ModelTier, ProjectAnalysis};

const AGENT_SYSTEM: &str = "You write sub-agent definitions for an AI coding assistant. \
Respond with a single Markdown document: YAML front matter with `name` and `description`, \
then the agent's role, responsibilities, and working rules.";

const SKILL_SYSTEM: &str = "You write reusable skills for an AI coding assistant. \
Respond with a single Markdown document: YAML front matter with `name` and `description`, \
then when to apply the skill and step-by-step instructions with short examples.";

const OVERVIEW_SYSTEM: &str = "You write the project overview an AI coding assistant reads \
before every session. Respond with Markdown: purpose, stack, layout, build and test \
commands, and conventions.";

const HOOK_SYSTEM: &str = "You write lifecycle hooks for an AI coding assistant. \
Respond with Markdown describing the trigger event, the shell command to run, and \
what a failure means.";

pub fn system_prompt(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Agent => AGENT_SYSTEM,
        ItemKind::Skill => SKILL_SYSTEM,
        ItemKind::Overview => OVERVIEW_SYSTEM,
        ItemKind::Hook => HOOK_SYSTEM,
    }
}

/// Render the user prompt for one task
pub fn render(goal: &str, task: &GenerationTask, context: Option<&ProjectAnalysis>) -> String {
    let mut sections = vec![format!("## Goal\n{}", goal.trim())];

    let target = match task.kind {
        ItemKind::Overview => "Write the project overview document.".to_string(),
        kind => format!("Write the `{}` {}.", task.name, kind),
    };
    sections.push(format!("## Task\n{}", target));

    if let Some(analysis) = context {
        let mut lines = Vec::new();
        if !analysis.project_type.is_empty() {
            lines.push(format!("- Project type: {}", analysis.project_type));
        }
        if !analysis.manifests.is_empty() {
            lines.push(format!("- Manifests: {}", analysis.manifests.join(", ")));
        }
        if !analysis.source_dirs.is_empty() {
            lines.push(format!("- Source directories: {}", analysis.source_dirs.join(", ")));
        }
        if !analysis.dependencies.is_empty() {
            lines.push(format!("- Dependencies: {}", analysis.dependencies.join(", ")));
        }
        if !analysis.patterns.is_empty() {
            lines.push(format!("- Patterns: {}", analysis.patterns.join(", ")));
        }
        if !lines.is_empty() {
            sections.push(format!("## Project\n{}", lines.join("\n")));
        }
    }

    sections.push("Return only the document, without surrounding commentary.".to_string());
    sections.join("\n\n")
}

/// Build the provider request for one task
pub fn request(
    goal: &str,
    task: &GenerationTask,
    tier: ModelTier,
    context: Option<&ProjectAnalysis>,
) -> GenerationRequest {
    GenerationRequest {
        system: system_prompt(task.kind).to_string(),
        prompt: render(goal, task, context),
        tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_context() {
        let task = GenerationTask::new(ItemKind::Skill, "testing", None);
        let prompt = render("  ship a REST api ", &task, None);
        assert!(prompt.starts_with("## Goal\nship a REST api"));
        assert!(prompt.contains("Write the `testing` skill."));
        assert!(!prompt.contains("## Project"));
    }

    #[test]
    fn test_render_with_context() {
        let task = GenerationTask::new(ItemKind::Overview, "overview", None);
        let analysis = ProjectAnalysis {
            project_type: "rust".to_string(),
            manifests: vec!["Cargo.toml".to_string()],
            dependencies: vec!["tokio".to_string(), "serde".to_string()],
            ..ProjectAnalysis::default()
        };
        let prompt = render("document it", &task, Some(&analysis));
        assert!(prompt.contains("Write the project overview document."));
        assert!(prompt.contains("- Project type: rust"));
        assert!(prompt.contains("- Dependencies: tokio, serde"));
        assert!(!prompt.contains("Patterns"));
    }

    #[test]
    fn test_request_carries_tier_and_system_prompt() {
        let task = GenerationTask::new(ItemKind::Hook, "pre-commit", None);
        let request = request("lint", &task, ModelTier::Low, None);
        assert_eq!(request.tier, ModelTier::Low);
        assert_eq!(request.system, HOOK_SYSTEM);
    }
}
