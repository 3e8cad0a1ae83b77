//! Generation Cache
//!
//! Durable, versioned, TTL-aware storage for two namespaces:
//!
//! 1. **Analysis**: detected project characteristics, keyed by project fingerprint (short TTL)
//! 2. **Generation**: generated text artifacts, keyed by [`GenerationKey`] hash (long TTL)
//!
//! ## Layout
//!
//! ```text
//! <dir>/analysis/<fingerprint>.json       envelope with data
//! <dir>/generation/<key>.md               body
//! <dir>/generation/<key>.meta.json        envelope without data, written last
//! ```
//!
//! Caching is an optimization only. Every read fault is a miss and every write
//! fault is logged and dropped, so callers never see a `CacheFault`.

mod envelope;
mod fingerprint;

pub use envelope::{CacheEnvelope, CacheValidation, Gates, InvalidReason};
pub use fingerprint::{
    GenerationKey, compute_project_fingerprint, goal_fingerprint, present_source_dirs,
    project_fingerprint,
};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CacheSettings;
use crate::constants::cache as cache_constants;
use crate::types::{ProjectAnalysis, Result};

/// Internal cache failure. Never leaves this module except through `clear`.
#[derive(Debug, Error)]
enum CacheFault {
    #[error("cache I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache encode: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unsafe cache key: {0}")]
    UnsafeKey(String),
}

/// Time source for TTL checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cache directory path
    pub dir: PathBuf,
    /// When false every read misses and every write is skipped
    pub enabled: bool,
    /// Schema version written to and required of every entry
    pub schema_version: String,
    pub analysis_ttl: Duration,
    pub generation_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(cache_constants::DEFAULT_DIR),
            enabled: true,
            schema_version: cache_constants::SCHEMA_VERSION.to_string(),
            analysis_ttl: Duration::from_secs(cache_constants::ANALYSIS_TTL_SECS),
            generation_ttl: Duration::from_secs(cache_constants::GENERATION_TTL_SECS),
        }
    }
}

impl CacheConfig {
    /// Build from loaded settings; a relative `dir` resolves against `project_root`
    pub fn from_settings(settings: &CacheSettings, project_root: &Path) -> Self {
        let dir = if settings.dir.is_absolute() {
            settings.dir.clone()
        } else {
            project_root.join(&settings.dir)
        };

        Self {
            dir,
            enabled: settings.enabled,
            schema_version: cache_constants::SCHEMA_VERSION.to_string(),
            analysis_ttl: Duration::from_secs(settings.analysis_ttl_secs),
            generation_ttl: Duration::from_secs(settings.generation_ttl_secs),
        }
    }

    /// Configuration for a cache rooted at `dir` with default lifetimes
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub analysis_count: usize,
    pub generation_count: usize,
    pub total_size_bytes: u64,
}

/// Versioned, TTL-aware artifact store
pub struct CacheStore {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Store that never hits and never writes
    pub fn disabled() -> Self {
        Self::new(CacheConfig {
            enabled: false,
            ..Default::default()
        })
    }

    /// Replace the time source (tests, replay)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn analysis_dir(&self) -> PathBuf {
        self.config.dir.join(cache_constants::ANALYSIS_DIR)
    }

    fn generation_dir(&self) -> PathBuf {
        self.config.dir.join(cache_constants::GENERATION_DIR)
    }

    fn gates<'a>(&'a self, hash: &'a str, ttl: Duration) -> Gates<'a> {
        Gates {
            hash,
            version: &self.config.schema_version,
            ttl,
            now: self.clock.now(),
        }
    }

    // =========================================================================
    // Analysis namespace
    // =========================================================================

    /// Cached analysis for the project at `root`, if present and valid
    pub async fn get_analysis(&self, root: &Path) -> Option<ProjectAnalysis> {
        if !self.config.enabled {
            return None;
        }
        match project_fingerprint(root).await {
            Ok(fingerprint) => self.get_analysis_for(&fingerprint).await,
            Err(e) => {
                debug!("Analysis cache miss: cannot fingerprint {}: {}", root.display(), e);
                None
            }
        }
    }

    /// Cached analysis stored under an already computed fingerprint
    pub async fn get_analysis_for(&self, fingerprint: &str) -> Option<ProjectAnalysis> {
        if !self.config.enabled || !is_safe_key(fingerprint) {
            return None;
        }

        let path = self.analysis_dir().join(format!("{}.json", fingerprint));
        let raw = read_if_present(&path).await?;

        match self.check_analysis(fingerprint, &raw) {
            CacheValidation::Ok(analysis) => {
                debug!("Analysis cache hit: {}", short(fingerprint));
                Some(analysis)
            }
            CacheValidation::Invalid(reason) => {
                debug!("Analysis cache miss ({}): {}", short(fingerprint), reason);
                None
            }
        }
    }

    /// All gates plus the requirement that an analysis envelope carries data
    fn check_analysis(&self, fingerprint: &str, raw: &[u8]) -> CacheValidation<ProjectAnalysis> {
        self.gates(fingerprint, self.config.analysis_ttl)
            .check::<ProjectAnalysis>(raw)
            .and_then(|envelope| match envelope.data {
                Some(data) => CacheValidation::Ok(data),
                None => CacheValidation::Invalid(InvalidReason::MissingData),
            })
    }

    /// Store `analysis` for the project at `root`
    pub async fn put_analysis(&self, root: &Path, analysis: &ProjectAnalysis) {
        if !self.config.enabled {
            return;
        }
        match project_fingerprint(root).await {
            Ok(fingerprint) => self.put_analysis_for(&fingerprint, analysis).await,
            Err(e) => warn!("Skipping analysis cache write for {}: {}", root.display(), e),
        }
    }

    /// Store `analysis` under an already computed fingerprint
    pub async fn put_analysis_for(&self, fingerprint: &str, analysis: &ProjectAnalysis) {
        if !self.config.enabled {
            return;
        }
        if let Err(e) = self.write_analysis(fingerprint, analysis).await {
            warn!("Failed to write analysis cache {}: {}", short(fingerprint), e);
        }
    }

    async fn write_analysis(
        &self,
        fingerprint: &str,
        analysis: &ProjectAnalysis,
    ) -> std::result::Result<(), CacheFault> {
        ensure_safe_key(fingerprint)?;
        let envelope = CacheEnvelope::new(
            &self.config.schema_version,
            fingerprint,
            self.clock.now(),
            Some(analysis),
        );
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        let path = self.analysis_dir().join(format!("{}.json", fingerprint));
        write_atomic(&path, &bytes).await?;
        debug!("Stored analysis cache {}", short(fingerprint));
        Ok(())
    }

    // =========================================================================
    // Generation namespace
    // =========================================================================

    /// Cached text for a generation key hash
    pub async fn get_generation(&self, key: &str) -> Option<String> {
        if !self.config.enabled || !is_safe_key(key) {
            return None;
        }

        let (body_path, meta_path) = self.generation_paths(key);
        let raw_meta = read_if_present(&meta_path).await?;

        let checked = self
            .gates(key, self.config.generation_ttl)
            .check::<serde_json::Value>(&raw_meta);
        if let CacheValidation::Invalid(reason) = checked {
            debug!("Generation cache miss ({}): {}", short(key), reason);
            return None;
        }

        let body = read_if_present(&body_path).await?;
        match String::from_utf8(body) {
            Ok(text) => {
                debug!("Generation cache hit: {}", short(key));
                Some(text)
            }
            Err(e) => {
                debug!("Generation cache miss ({}): body is not UTF-8: {}", short(key), e);
                None
            }
        }
    }

    /// Store generated text under a generation key hash
    pub async fn put_generation(&self, key: &str, text: &str) {
        if !self.config.enabled {
            return;
        }
        if let Err(e) = self.write_generation(key, text).await {
            warn!("Failed to write generation cache {}: {}", short(key), e);
        }
    }

    async fn write_generation(&self, key: &str, text: &str) -> std::result::Result<(), CacheFault> {
        ensure_safe_key(key)?;
        let (body_path, meta_path) = self.generation_paths(key);

        // Body first: the metadata file is what makes the entry visible.
        write_atomic(&body_path, text.as_bytes()).await?;

        let envelope: CacheEnvelope<()> =
            CacheEnvelope::new(&self.config.schema_version, key, self.clock.now(), None);
        let meta = serde_json::to_vec_pretty(&envelope)?;
        write_atomic(&meta_path, &meta).await?;

        debug!("Stored generation cache {} ({} bytes)", short(key), text.len());
        Ok(())
    }

    fn generation_paths(&self, key: &str) -> (PathBuf, PathBuf) {
        let dir = self.generation_dir();
        (
            dir.join(format!("{}{}", key, cache_constants::BODY_SUFFIX)),
            dir.join(format!("{}{}", key, cache_constants::META_SUFFIX)),
        )
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Remove the whole cache directory
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.config.dir).await {
            Ok(()) => {
                info!("Cleared cache at {}", self.config.dir.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entry counts and on-disk size. Unreadable directories count as empty.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();

        for (name, size) in list_files(&self.analysis_dir()).await {
            stats.total_size_bytes += size;
            if name.ends_with(".json") {
                stats.analysis_count += 1;
            }
        }

        for (name, size) in list_files(&self.generation_dir()).await {
            stats.total_size_bytes += size;
            if name.ends_with(cache_constants::META_SUFFIX) {
                stats.generation_count += 1;
            }
        }

        stats
    }

    /// Delete entries that would no longer be served: expired, wrong version,
    /// malformed, or generation bodies without metadata. Returns entries removed.
    pub async fn prune(&self) -> usize {
        let mut removed = 0;

        for (name, _) in list_files(&self.analysis_dir()).await {
            let Some(hash) = name.strip_suffix(".json") else {
                continue;
            };
            let path = self.analysis_dir().join(&name);
            let valid = match tokio::fs::read(&path).await {
                Ok(raw) => self.check_analysis(hash, &raw).is_ok(),
                Err(_) => false,
            };
            if !valid && tokio::fs::remove_file(&path).await.is_ok() {
                removed += 1;
            }
        }

        let generation = list_files(&self.generation_dir()).await;
        for (name, _) in &generation {
            if let Some(hash) = name.strip_suffix(cache_constants::META_SUFFIX) {
                let (body_path, meta_path) = self.generation_paths(hash);
                let valid = match tokio::fs::read(&meta_path).await {
                    Ok(raw) => self
                        .gates(hash, self.config.generation_ttl)
                        .check::<serde_json::Value>(&raw)
                        .is_ok(),
                    Err(_) => false,
                };
                if !valid {
                    let _ = tokio::fs::remove_file(&body_path).await;
                    if tokio::fs::remove_file(&meta_path).await.is_ok() {
                        removed += 1;
                    }
                }
            } else if let Some(hash) = name.strip_suffix(cache_constants::BODY_SUFFIX) {
                let (body_path, meta_path) = self.generation_paths(hash);
                if !tokio::fs::try_exists(&meta_path).await.unwrap_or(false) {
                    let _ = tokio::fs::remove_file(&body_path).await;
                }
            }
        }

        if removed > 0 {
            info!("Pruned {} stale cache entries", removed);
        }
        removed
    }
}

// =============================================================================
// File helpers
// =============================================================================

/// Keys become file names; only plain hex-ish names are accepted
fn is_safe_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= 128 && key.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn ensure_safe_key(key: &str) -> std::result::Result<(), CacheFault> {
    if is_safe_key(key) {
        Ok(())
    } else {
        Err(CacheFault::UnsafeKey(key.to_string()))
    }
}

fn short(key: &str) -> &str {
    key.char_indices().nth(12).map_or(key, |(i, _)| &key[..i])
}

/// Read a file; any failure (including absence) is `None`
async fn read_if_present(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(raw) => Some(raw),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Cache miss: {} not present", path.display());
            None
        }
        Err(e) => {
            debug!("Cache miss: cannot read {}: {}", path.display(), e);
            None
        }
    }
}

/// Write via a uniquely named temp file and rename, so readers never see a torn file
async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let Some(parent) = path.parent() else {
        return Err(std::io::Error::other("cache path has no parent"));
    };
    tokio::fs::create_dir_all(parent).await?;

    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = parent.join(format!(".{}.{}.{}.tmp", file_name, std::process::id(), nanos));

    tokio::fs::write(&tmp, bytes).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

/// (file name, size) for regular files directly inside `dir`; temp files skipped
async fn list_files(dir: &Path) -> Vec<(String, u64)> {
    let mut files = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => return files,
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') && name.ends_with(".tmp") {
            continue;
        }
        files.push((name, metadata.len()));
    }

    files
}
