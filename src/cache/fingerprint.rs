//! Project and generation fingerprints.
//!
//! A project fingerprint hashes manifest/lock file *content* plus the sorted
//! *names* of files under up to two conventional source directories. Editing a
//! line in a source file leaves it unchanged; touching dependencies or adding
//! and removing files changes it.

use std::fs;
use std::io;
use std::path::Path;

use ignore::WalkBuilder;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::constants::fingerprint::{MANIFEST_FILES, MAX_SOURCE_DIRS, SKIP_DIRS, SOURCE_DIRS};
use crate::types::{GenerationTask, ItemKind, ModelTier};

/// Length-prefixed field so adjacent fields can't run together
fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Compute the fingerprint of the project rooted at `root`.
///
/// Blocking; async callers should use [`project_fingerprint`].
pub fn compute_project_fingerprint(root: &Path) -> io::Result<String> {
    let mut hasher = Sha256::new();

    for name in MANIFEST_FILES {
        let path = root.join(name);
        if !path.is_file() {
            continue;
        }
        let content = fs::read(&path)?;
        update_field(&mut hasher, b"manifest");
        update_field(&mut hasher, name.as_bytes());
        update_field(&mut hasher, &content);
    }

    for dir in present_source_dirs(root) {
        let listing = source_listing(root, dir);
        let tree_hash = Sha256::digest(listing.join("\n").as_bytes());
        update_field(&mut hasher, b"tree");
        update_field(&mut hasher, dir.as_bytes());
        update_field(&mut hasher, &tree_hash);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Async wrapper running the directory walk on the blocking pool
pub async fn project_fingerprint(root: &Path) -> io::Result<String> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || compute_project_fingerprint(&root))
        .await
        .map_err(|e| io::Error::other(e.to_string()))?
}

/// First [`MAX_SOURCE_DIRS`] conventional source directories that exist
pub fn present_source_dirs(root: &Path) -> Vec<&'static str> {
    SOURCE_DIRS
        .iter()
        .copied()
        .filter(|dir| root.join(dir).is_dir())
        .take(MAX_SOURCE_DIRS)
        .collect()
}

/// Sorted, `/`-separated file paths under `root/dir`, relative to `root`.
/// Entries the walker cannot read are left out.
fn source_listing(root: &Path, dir: &str) -> Vec<String> {
    let walker = WalkBuilder::new(root.join(dir))
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .follow_links(false)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIP_DIRS.contains(&name)))
        })
        .build();

    let mut paths = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", dir, e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            let normalized: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            paths.push(normalized.join("/"));
        }
    }

    paths.sort();
    paths
}

/// Hash of the user's goal, insensitive to surrounding and repeated whitespace
pub fn goal_fingerprint(goal: &str) -> String {
    let normalized = goal.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{:x}", Sha256::digest(normalized.as_bytes()))
}

/// Identity of one generated artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenerationKey {
    pub goal_fingerprint: String,
    pub codebase_fingerprint: String,
    pub kind: ItemKind,
    pub name: String,
    pub tier: ModelTier,
}

impl GenerationKey {
    pub fn new(goal: &str, codebase_fingerprint: &str, task: &GenerationTask, tier: ModelTier) -> Self {
        Self {
            goal_fingerprint: goal_fingerprint(goal),
            codebase_fingerprint: codebase_fingerprint.to_string(),
            kind: task.kind,
            name: task.name.clone(),
            tier,
        }
    }

    /// Deterministic hex digest of all fields
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, self.goal_fingerprint.as_bytes());
        update_field(&mut hasher, self.codebase_fingerprint.as_bytes());
        update_field(&mut hasher, self.kind.as_str().as_bytes());
        update_field(&mut hasher, self.name.as_bytes());
        update_field(&mut hasher, self.tier.as_str().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("Cargo.toml"), "[package]\nname = \"demo\"\n").unwrap();
        fs::write(root.join("Cargo.lock"), "version = 3\n").unwrap();
        fs::create_dir_all(root.join("src/bin")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::write(root.join("src/bin/tool.rs"), "fn main() {}\n").unwrap();
        dir
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let dir = project();
        let first = compute_project_fingerprint(dir.path()).unwrap();
        let second = compute_project_fingerprint(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_source_edit_keeps_fingerprint() {
        let dir = project();
        let before = compute_project_fingerprint(dir.path()).unwrap();
        fs::write(
            dir.path().join("src/main.rs"),
            "// entry point\nfn main() {}\n",
        )
        .unwrap();
        assert_eq!(before, compute_project_fingerprint(dir.path()).unwrap());
    }

    #[test]
    fn test_lock_edit_changes_fingerprint() {
        let dir = project();
        let before = compute_project_fingerprint(dir.path()).unwrap();
        fs::write(dir.path().join("Cargo.lock"), "version = 4\n").unwrap();
        assert_ne!(before, compute_project_fingerprint(dir.path()).unwrap());
    }

    #[test]
    fn test_added_file_changes_fingerprint() {
        let dir = project();
        let before = compute_project_fingerprint(dir.path()).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "").unwrap();
        assert_ne!(before, compute_project_fingerprint(dir.path()).unwrap());
    }

    #[test]
    fn test_hidden_and_build_dirs_are_ignored() {
        let dir = project();
        let before = compute_project_fingerprint(dir.path()).unwrap();

        fs::create_dir_all(dir.path().join("src/node_modules/pkg")).unwrap();
        fs::write(dir.path().join("src/node_modules/pkg/index.js"), "").unwrap();
        fs::create_dir_all(dir.path().join("src/.cache")).unwrap();
        fs::write(dir.path().join("src/.cache/entry"), "").unwrap();
        fs::write(dir.path().join("src/.DS_Store"), "").unwrap();

        assert_eq!(before, compute_project_fingerprint(dir.path()).unwrap());
    }

    #[test]
    fn test_files_outside_source_dirs_are_ignored() {
        let dir = project();
        let before = compute_project_fingerprint(dir.path()).unwrap();
        fs::write(dir.path().join("README.md"), "# demo").unwrap();
        assert_eq!(before, compute_project_fingerprint(dir.path()).unwrap());
    }

    #[test]
    fn test_only_two_source_dirs_count() {
        let dir = project();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        assert_eq!(present_source_dirs(dir.path()), vec!["src", "lib"]);

        let before = compute_project_fingerprint(dir.path()).unwrap();
        fs::write(dir.path().join("app/extra.rs"), "").unwrap();
        assert_eq!(before, compute_project_fingerprint(dir.path()).unwrap());
    }

    #[test]
    fn test_walk_errors_do_not_fail_fingerprint() {
        let dir = project();
        fs::create_dir_all(dir.path().join("src/broken")).unwrap();
        fs::write(dir.path().join("src/broken/.gitignore"), "[\n").unwrap();
        fs::write(dir.path().join("src/broken/mod.rs"), "").unwrap();

        let before = compute_project_fingerprint(dir.path()).unwrap();
        fs::write(dir.path().join("src/extra.rs"), "").unwrap();
        let after = compute_project_fingerprint(dir.path()).unwrap();
        assert_ne!(before, after);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = project();
        let locked = dir.path().join("src/locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("secret.rs"), "").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = compute_project_fingerprint(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_project_has_stable_fingerprint() {
        let dir = TempDir::new().unwrap();
        let a = compute_project_fingerprint(dir.path()).unwrap();
        let b = compute_project_fingerprint(dir.path()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_goal_fingerprint_normalizes_whitespace() {
        assert_eq!(
            goal_fingerprint("  build a   REST api "),
            goal_fingerprint("build a REST api")
        );
        assert_ne!(goal_fingerprint("build a REST api"), goal_fingerprint("build a CLI"));
    }

    #[test]
    fn test_generation_key_is_pure() {
        let task = GenerationTask::new(ItemKind::Skill, "testing", None);
        let a = GenerationKey::new("ship it", "fp", &task, ModelTier::Mid);
        let b = GenerationKey::new("ship it", "fp", &task, ModelTier::Mid);
        assert_eq!(a.hash(), b.hash());

        let other_tier = GenerationKey::new("ship it", "fp", &task, ModelTier::High);
        assert_ne!(a.hash(), other_tier.hash());

        let other_kind = GenerationKey::new(
            "ship it",
            "fp",
            &GenerationTask::new(ItemKind::Agent, "testing", None),
            ModelTier::Mid,
        );
        assert_ne!(a.hash(), other_kind.hash());
    }

    #[test]
    fn test_generation_key_fields_do_not_run_together() {
        let a = GenerationKey {
            goal_fingerprint: "ab".to_string(),
            codebase_fingerprint: "c".to_string(),
            kind: ItemKind::Agent,
            name: "x".to_string(),
            tier: ModelTier::Low,
        };
        let b = GenerationKey {
            goal_fingerprint: "a".to_string(),
            codebase_fingerprint: "bc".to_string(),
            ..a.clone()
        };
        assert_ne!(a.hash(), b.hash());
    }
}
