//! Project Analyzer
//!
//! Produces the [`ProjectAnalysis`] summary that is cached under the project
//! fingerprint and fed into generation prompts.
//!
//! Detection is manifest-based: project type, direct dependencies and a few
//! structural patterns are read from well-known files without parsing source.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{CacheStore, present_source_dirs, project_fingerprint};
use crate::constants::fingerprint::MANIFEST_FILES;
use crate::types::{ProjectAnalysis, Result};

/// Limit on dependency names carried in an analysis
const MAX_DEPENDENCIES: usize = 40;

/// Produces a project summary for a directory
#[async_trait]
pub trait ProjectDetector: Send + Sync {
    async fn detect(&self, root: &Path) -> Result<ProjectAnalysis>;
}

/// Detector reading manifests and top-level layout
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestDetector;

#[async_trait]
impl ProjectDetector for ManifestDetector {
    async fn detect(&self, root: &Path) -> Result<ProjectAnalysis> {
        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || detect_blocking(&root))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?
    }
}

fn detect_blocking(root: &Path) -> Result<ProjectAnalysis> {
    let manifests: Vec<String> = MANIFEST_FILES
        .iter()
        .filter(|name| root.join(name).is_file())
        .map(|name| name.to_string())
        .collect();

    let project_type = project_type(&manifests).to_string();

    let mut dependencies = Vec::new();
    for manifest in &manifests {
        let content = std::fs::read_to_string(root.join(manifest))?;
        dependencies.extend(manifest_dependencies(manifest, &content));
    }
    dependencies.sort();
    dependencies.dedup();
    dependencies.truncate(MAX_DEPENDENCIES);

    let source_dirs = present_source_dirs(root)
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(ProjectAnalysis {
        project_type,
        manifests,
        dependencies,
        patterns: patterns(root),
        source_dirs,
    })
}

fn project_type(manifests: &[String]) -> &'static str {
    let has = |name: &str| manifests.iter().any(|m| m == name);
    if has("Cargo.toml") {
        "rust"
    } else if has("go.mod") {
        "go"
    } else if has("pyproject.toml") || has("requirements.txt") || has("Pipfile.lock") {
        "python"
    } else if has("package.json") {
        "node"
    } else if has("Gemfile") {
        "ruby"
    } else if has("composer.json") {
        "php"
    } else if has("pom.xml") || has("build.gradle") {
        "jvm"
    } else {
        "unknown"
    }
}

/// Direct dependency names declared by one manifest. Lock files contribute nothing.
fn manifest_dependencies(manifest: &str, content: &str) -> Vec<String> {
    match manifest {
        "Cargo.toml" => toml_table_keys(
            content,
            &["dependencies", "dev-dependencies", "workspace.dependencies"],
        ),
        "pyproject.toml" => pyproject_dependencies(content),
        "package.json" | "composer.json" => json_object_keys(
            content,
            &["dependencies", "devDependencies", "require", "require-dev"],
        ),
        "requirements.txt" => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
            .filter_map(requirement_name)
            .collect(),
        "go.mod" => go_requirements(content),
        _ => Vec::new(),
    }
}

fn toml_table_keys(content: &str, tables: &[&str]) -> Vec<String> {
    let Ok(doc) = content.parse::<toml::Table>() else {
        debug!("Unparseable TOML manifest, skipping dependencies");
        return Vec::new();
    };

    let mut names = Vec::new();
    for table in tables {
        let mut node = Some(&doc);
        for part in table.split('.') {
            node = node.and_then(|t| t.get(part)).and_then(|v| v.as_table());
        }
        if let Some(deps) = node {
            names.extend(deps.keys().cloned());
        }
    }
    names
}

fn pyproject_dependencies(content: &str) -> Vec<String> {
    let Ok(doc) = content.parse::<toml::Table>() else {
        return Vec::new();
    };

    let mut names: Vec<String> = doc
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .filter_map(requirement_name)
                .collect()
        })
        .unwrap_or_default();

    // Poetry keeps dependencies as a table
    names.extend(
        toml_table_keys(content, &["tool.poetry.dependencies"])
            .into_iter()
            .filter(|name| name != "python"),
    );
    names
}

fn json_object_keys(content: &str, fields: &[&str]) -> Vec<String> {
    let Ok(doc) = serde_json::from_str::<Value>(content) else {
        return Vec::new();
    };
    fields
        .iter()
        .filter_map(|field| doc.get(field).and_then(|v| v.as_object()))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Package name from a PEP 508 requirement string
fn requirement_name(spec: &str) -> Option<String> {
    let name: String = spec
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    (!name.is_empty()).then_some(name)
}

fn go_requirements(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_block = false;
    for line in content.lines().map(str::trim) {
        if line.starts_with("require (") {
            in_block = true;
        } else if in_block && line == ")" {
            in_block = false;
        } else if in_block {
            if let Some(module) = line.split_whitespace().next()
                && !module.starts_with("//")
            {
                names.push(module.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("require ")
            && let Some(module) = rest.split_whitespace().next()
        {
            names.push(module.to_string());
        }
    }
    names
}

fn patterns(root: &Path) -> Vec<String> {
    let checks: [(&str, bool); 7] = [
        (
            "cli",
            root.join("src/main.rs").is_file()
                || root.join("src/bin").is_dir()
                || root.join("cmd").is_dir(),
        ),
        ("library", root.join("src/lib.rs").is_file()),
        (
            "monorepo",
            root.join("packages").is_dir() || root.join("crates").is_dir(),
        ),
        ("docker", root.join("Dockerfile").is_file()),
        ("github-actions", root.join(".github/workflows").is_dir()),
        ("tests", root.join("tests").is_dir() || root.join("test").is_dir()),
        ("docs", root.join("docs").is_dir()),
    ];
    checks
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Result of [`analyze_with_cache`]
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub fingerprint: String,
    pub analysis: ProjectAnalysis,
    pub from_cache: bool,
}

/// Fingerprint the project, then serve the analysis from cache or run the detector and store it.
pub async fn analyze_with_cache(
    cache: &CacheStore,
    detector: &dyn ProjectDetector,
    root: &Path,
) -> Result<AnalysisOutcome> {
    let fingerprint = project_fingerprint(root).await?;

    if let Some(analysis) = cache.get_analysis_for(&fingerprint).await {
        debug!("Using cached project analysis");
        return Ok(AnalysisOutcome {
            fingerprint,
            analysis,
            from_cache: true,
        });
    }

    let analysis = detector.detect(root).await?;
    cache.put_analysis_for(&fingerprint, &analysis).await;
    info!(
        "Analyzed project: {} ({} dependencies)",
        analysis.project_type,
        analysis.dependencies.len()
    );

    Ok(AnalysisOutcome {
        fingerprint,
        analysis,
        from_cache: false,
    })
}
