//! Generation Orchestrator
//!
//! Turns a selection of agents, skills, hooks and the overview document into
//! generated Markdown, consulting the cache before any external call:
//!
//! ```text
//! PENDING ──cache hit──────────────────────────────▶ DONE (cache)
//!    └─────miss──▶ IN_FLIGHT ──ok, written to cache──▶ DONE (fresh)
//!                      └──────error / timeout────────▶ FAILED
//! ```
//!
//! Tiers are resolved with [`TierPolicy::select`], the same rule the dry-run
//! estimator uses.

pub mod prompt;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::ai::{ComplexityTable, SharedProvider, TierPolicy, TokenUsage, with_timeout};
use crate::cache::{CacheStore, GenerationKey};
use crate::config::{Config, FailureMode};
use crate::dispatch::Dispatcher;
use crate::types::{
    CrewError, GenerationTask, ItemKind, ItemSelection, LlmError, ModelTier, ProjectAnalysis,
    Result,
};

/// Where a completed item's content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    Cache,
    Fresh,
}

/// A successfully produced item
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedItem {
    pub kind: ItemKind,
    pub name: String,
    pub tier: ModelTier,
    pub content: String,
    pub source: ItemSource,
    /// Zero for cache hits
    pub usage: TokenUsage,
    pub cost_usd: f64,
    /// Model that answered; `None` for cache hits or when the provider does not say
    pub model: Option<String>,
    /// Wall-clock time of the call; zero for cache hits
    pub elapsed_ms: u64,
}

/// An item whose external call failed
#[derive(Debug, Clone)]
pub struct FailedItem {
    pub kind: ItemKind,
    pub name: String,
    pub tier: ModelTier,
    pub error: LlmError,
}

impl FailedItem {
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.name)
    }
}

/// Outcome of one batch
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Request order
    pub completed: Vec<GeneratedItem>,
    /// Request order
    pub failed: Vec<FailedItem>,
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Actual usage of fresh calls
    pub usage: TokenUsage,
    /// Actual cost reported by the provider (0.0 when it does not report one)
    pub cost_usd: f64,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Per-item progress notification
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Served from cache; no call made
    CacheHit { label: String, tier: ModelTier },
    /// Fresh call succeeded
    Generated {
        label: String,
        tier: ModelTier,
        completed: usize,
        total: usize,
    },
    /// Fresh call failed
    Failed {
        label: String,
        error: String,
        completed: usize,
        total: usize,
    },
}

pub type ProgressSink = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// A cache miss waiting for dispatch
#[derive(Debug, Clone)]
struct PendingItem {
    index: usize,
    task: GenerationTask,
    tier: ModelTier,
    key: String,
}

pub struct GenerationOrchestrator {
    cache: Arc<CacheStore>,
    provider: SharedProvider,
    dispatcher: Dispatcher,
    policy: TierPolicy,
    complexity: ComplexityTable,
    failure_mode: FailureMode,
    timeout: Duration,
    context: Option<ProjectAnalysis>,
    progress: Option<ProgressSink>,
}

impl GenerationOrchestrator {
    pub fn new(cache: Arc<CacheStore>, provider: SharedProvider) -> Self {
        Self {
            cache,
            provider,
            dispatcher: Dispatcher::default(),
            policy: TierPolicy::default(),
            complexity: ComplexityTable::default(),
            failure_mode: FailureMode::default(),
            timeout: Duration::from_secs(crate::constants::network::DEFAULT_TIMEOUT_SECS),
            context: None,
            progress: None,
        }
    }

    /// Build from loaded configuration. Fails on an out-of-range concurrency.
    ///
    /// Project context is per run, not configuration; chain [`Self::with_context`].
    pub fn from_config(
        config: &Config,
        cache: Arc<CacheStore>,
        provider: SharedProvider,
    ) -> Result<Self> {
        Ok(Self::new(cache, provider)
            .with_dispatcher(Dispatcher::new(config.generation.concurrency)?)
            .with_policy(TierPolicy::from_settings(&config.generation))
            .with_complexity(ComplexityTable::new(
                config.generation.skill_complexity.clone(),
            ))
            .with_failure_mode(config.generation.failure_mode)
            .with_timeout(config.llm.timeout()))
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_policy(mut self, policy: TierPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_complexity(mut self, complexity: ComplexityTable) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Project summary included in every prompt
    pub fn with_context(mut self, analysis: ProjectAnalysis) -> Self {
        self.context = Some(analysis);
        self
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// Tasks for a selection, with complexity resolved from the configured table
    pub fn tasks(&self, selection: &ItemSelection) -> Vec<GenerationTask> {
        selection.tasks(|kind, name| self.complexity.lookup(kind, name))
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sink) = &self.progress {
            sink(&event);
        }
    }

    /// Generate every selected item for `goal` against the given codebase fingerprint.
    ///
    /// Validation errors are returned before any cache access or call. In collect
    /// mode item failures are reported in [`BatchResult::failed`]; in strict mode
    /// the first one is returned as [`CrewError::Generation`].
    #[instrument(skip_all, fields(items = selection.len(), mode = ?self.failure_mode))]
    pub async fn run_generation_batch(
        &self,
        goal: &str,
        codebase_fingerprint: &str,
        selection: &ItemSelection,
    ) -> Result<BatchResult> {
        if goal.trim().is_empty() {
            return Err(CrewError::missing("goal", "goal must not be blank"));
        }
        if codebase_fingerprint.trim().is_empty() {
            return Err(CrewError::missing(
                "codebase_fingerprint",
                "codebase fingerprint must not be blank",
            ));
        }
        selection.validate()?;

        let tasks = self.tasks(selection);
        let mut slots: Vec<Option<GeneratedItem>> = (0..tasks.len()).map(|_| None).collect();
        let mut pending = Vec::new();
        let mut result = BatchResult::default();

        for (index, task) in tasks.into_iter().enumerate() {
            let tier = self.policy.select(&task);
            let key = GenerationKey::new(goal, codebase_fingerprint, &task, tier).hash();

            match self.cache.get_generation(&key).await {
                Some(content) => {
                    debug!("Cache hit for {} ({})", task, tier);
                    result.cache_hits += 1;
                    self.emit(ProgressEvent::CacheHit {
                        label: task.label(),
                        tier,
                    });
                    slots[index] = Some(GeneratedItem {
                        kind: task.kind,
                        name: task.name,
                        tier,
                        content,
                        source: ItemSource::Cache,
                        usage: TokenUsage::default(),
                        cost_usd: 0.0,
                        model: None,
                        elapsed_ms: 0,
                    });
                }
                None => {
                    result.cache_misses += 1;
                    pending.push(PendingItem {
                        index,
                        task,
                        tier,
                        key,
                    });
                }
            }
        }

        info!(
            "Generation: {} items ({} cached, {} to generate, concurrency={})",
            slots.len(),
            result.cache_hits,
            pending.len(),
            self.dispatcher.limit()
        );

        let total = pending.len();
        let finished = AtomicUsize::new(0);
        let worker = |item: PendingItem| self.generate_one(goal, item, &finished, total);

        let fresh = match self.failure_mode {
            FailureMode::Strict => self
                .dispatcher
                .run_bounded(pending, worker, |_, _, _| {})
                .await
                .map_err(|failed| CrewError::Generation {
                    item: failed.label(),
                    source: failed.error,
                })?,
            FailureMode::Collect => {
                let collected = self
                    .dispatcher
                    .run_bounded_collecting_errors(pending, worker, |_, _| {}, |_, _| {})
                    .await;
                result.failed = collected.errors.into_iter().map(|f| f.error).collect();
                collected.results
            }
        };

        for (index, item) in fresh {
            result.usage += item.usage;
            result.cost_usd += item.cost_usd;
            slots[index] = Some(item);
        }
        result.completed = slots.into_iter().flatten().collect();

        info!(
            "Generation complete: {} done, {} failed ({} input / {} output tokens)",
            result.completed.len(),
            result.failed.len(),
            result.usage.input_tokens,
            result.usage.output_tokens
        );

        Ok(result)
    }

    /// One external call; the result is cached before the item counts as done.
    async fn generate_one(
        &self,
        goal: &str,
        item: PendingItem,
        finished: &AtomicUsize,
        total: usize,
    ) -> std::result::Result<(usize, GeneratedItem), FailedItem> {
        let label = item.task.label();
        let request = prompt::request(goal, &item.task, item.tier, self.context.as_ref());

        let outcome = with_timeout(
            self.timeout,
            self.provider.generate(&request),
            &format!("generate {}", label),
        )
        .await;
        let completed = finished.fetch_add(1, Ordering::SeqCst) + 1;

        match outcome {
            Ok(response) => {
                debug!(
                    "Generated {} with {} via {} in {}ms (api {:?}ms)",
                    label,
                    response.metadata.model,
                    response.metadata.provider,
                    response.timing.total_ms,
                    response.timing.api_ms
                );
                self.cache.put_generation(&item.key, &response.content).await;
                self.emit(ProgressEvent::Generated {
                    label,
                    tier: item.tier,
                    completed,
                    total,
                });
                Ok((
                    item.index,
                    GeneratedItem {
                        kind: item.task.kind,
                        name: item.task.name,
                        tier: item.tier,
                        content: response.content,
                        source: ItemSource::Fresh,
                        usage: response.usage,
                        cost_usd: response.cost_usd,
                        model: Some(response.metadata.model).filter(|m| !m.is_empty()),
                        elapsed_ms: response.timing.total_ms,
                    },
                ))
            }
            Err(e) => {
                let error = e.into_llm_error(self.provider.name());
                warn!("Generation failed for {}: {}", label, error);
                self.emit(ProgressEvent::Failed {
                    label,
                    error: error.to_string(),
                    completed,
                    total,
                });
                Err(FailedItem {
                    kind: item.task.kind,
                    name: item.task.name,
                    tier: item.tier,
                    error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{
        CostEstimator, GenerationRequest, LlmProvider, LlmResponse, ResponseMetadata, ResponseTiming,
    };
    use crate::cache::CacheConfig;
    use crate::types::{ErrorCategory, ValidationError, ValidationErrorKind};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Provider double: answers from a script keyed on the task line of the prompt
    #[derive(Default)]
    struct ScriptedProvider {
        failures: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<(String, ModelTier)>>,
    }

    impl ScriptedProvider {
        fn failing(mut self, name: &str, message: &str) -> Self {
            self.failures.insert(name.to_string(), message.to_string());
            self
        }

        fn slow(mut self, name: &str, delay: Duration) -> Self {
            self.delays.insert(name.to_string(), delay);
            self
        }

        fn calls(&self) -> Vec<(String, ModelTier)> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn task_name(prompt: &str) -> String {
        prompt
            .split('`')
            .nth(1)
            .unwrap_or("overview")
            .to_string()
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse> {
            let name = task_name(&request.prompt);
            self.calls.lock().unwrap().push((name.clone(), request.tier));

            if let Some(delay) = self.delays.get(&name) {
                tokio::time::sleep(*delay).await;
            }
            if let Some(message) = self.failures.get(&name) {
                return Err(CrewError::Llm(crate::types::ErrorClassifier::classify(
                    message, "scripted",
                )));
            }

            let mut response = LlmResponse::content_only(format!("# {}\n", name));
            response.usage = TokenUsage::new(100, 40);
            response.cost_usd = 0.01;
            response.metadata = ResponseMetadata {
                model: self.model_for(request.tier).to_string(),
                provider: "scripted".to_string(),
            };
            response.timing = ResponseTiming::with_api_time(Duration::from_millis(7), Some(5));
            Ok(response)
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model_for(&self, tier: ModelTier) -> &str {
            tier.as_str()
        }
    }

    struct Fixture {
        _dir: TempDir,
        cache: Arc<CacheStore>,
        provider: Arc<ScriptedProvider>,
    }

    impl Fixture {
        fn new(provider: ScriptedProvider) -> Self {
            let dir = TempDir::new().unwrap();
            let cache = Arc::new(CacheStore::new(CacheConfig::at(dir.path().join("cache"))));
            Self {
                _dir: dir,
                cache,
                provider: Arc::new(provider),
            }
        }

        fn orchestrator(&self) -> GenerationOrchestrator {
            GenerationOrchestrator::new(Arc::clone(&self.cache), self.provider.clone())
        }
    }

    fn selection() -> ItemSelection {
        ItemSelection::new()
            .with_agents(["reviewer"])
            .with_skills(["linting", "security"])
            .with_hooks(["pre-commit"])
            .with_overview(true)
    }

    fn names(items: &[GeneratedItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_fresh_batch_generates_and_caches() {
        let fixture = Fixture::new(ScriptedProvider::default());
        let orchestrator = fixture.orchestrator();

        let result = orchestrator
            .run_generation_batch("ship a CLI", "fp-1", &selection())
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(
            names(&result.completed),
            vec!["reviewer", "linting", "security", "overview", "pre-commit"]
        );
        assert_eq!((result.cache_hits, result.cache_misses), (0, 5));
        assert!(result.completed.iter().all(|i| i.source == ItemSource::Fresh));
        assert_eq!(result.usage, TokenUsage::new(500, 200));
        assert!((result.cost_usd - 0.05).abs() < 1e-9);
        assert_eq!(fixture.provider.calls().len(), 5);
        for item in &result.completed {
            assert_eq!(item.model.as_deref(), Some(item.tier.as_str()));
            assert_eq!(item.elapsed_ms, 7);
        }

        let stats = fixture.cache.stats().await;
        assert_eq!(stats.generation_count, 5);
    }

    #[tokio::test]
    async fn test_second_run_is_served_from_cache() {
        let fixture = Fixture::new(ScriptedProvider::default());
        let orchestrator = fixture.orchestrator();

        let first = orchestrator
            .run_generation_batch("ship a CLI", "fp-1", &selection())
            .await
            .unwrap();
        let second = orchestrator
            .run_generation_batch("ship a CLI", "fp-1", &selection())
            .await
            .unwrap();

        assert_eq!((second.cache_hits, second.cache_misses), (5, 0));
        assert!(second.completed.iter().all(|i| i.source == ItemSource::Cache));
        assert!(second.completed.iter().all(|i| i.model.is_none() && i.elapsed_ms == 0));
        assert_eq!(second.usage, TokenUsage::default());
        assert_eq!(fixture.provider.calls().len(), 5);

        let first_content: Vec<&str> = first.completed.iter().map(|i| i.content.as_str()).collect();
        let second_content: Vec<&str> =
            second.completed.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(first_content, second_content);
    }

    #[tokio::test]
    async fn test_changed_fingerprint_misses_cache() {
        let fixture = Fixture::new(ScriptedProvider::default());
        let orchestrator = fixture.orchestrator();
        let selection = ItemSelection::new().with_skills(["testing"]);

        orchestrator
            .run_generation_batch("ship", "fp-1", &selection)
            .await
            .unwrap();
        let result = orchestrator
            .run_generation_batch("ship", "fp-2", &selection)
            .await
            .unwrap();

        assert_eq!(result.cache_misses, 1);
        assert_eq!(fixture.provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_cache_mixes_sources_in_request_order() {
        let fixture = Fixture::new(ScriptedProvider::default());
        let orchestrator = fixture.orchestrator();

        orchestrator
            .run_generation_batch("ship", "fp", &ItemSelection::new().with_skills(["security"]))
            .await
            .unwrap();

        let result = orchestrator
            .run_generation_batch(
                "ship",
                "fp",
                &ItemSelection::new().with_skills(["linting", "security", "docker"]),
            )
            .await
            .unwrap();

        let sources: Vec<ItemSource> = result.completed.iter().map(|i| i.source).collect();
        assert_eq!(
            sources,
            vec![ItemSource::Fresh, ItemSource::Cache, ItemSource::Fresh]
        );
        assert_eq!(names(&result.completed), vec!["linting", "security", "docker"]);
    }

    #[tokio::test]
    async fn test_collect_mode_reports_failures() {
        let fixture = Fixture::new(
            ScriptedProvider::default().failing("security", "429 Too Many Requests"),
        );
        let orchestrator = fixture.orchestrator();

        let result = orchestrator
            .run_generation_batch("ship", "fp", &selection())
            .await
            .unwrap();

        assert_eq!(result.completed.len(), 4);
        assert_eq!(result.failed.len(), 1);
        let failed = &result.failed[0];
        assert_eq!(failed.label(), "skill:security");
        assert_eq!(failed.tier, ModelTier::High);
        assert_eq!(failed.error.category, ErrorCategory::RateLimit);

        // Failures are not cached; a retry calls again
        assert_eq!(fixture.cache.stats().await.generation_count, 4);
    }

    #[tokio::test]
    async fn test_strict_mode_returns_first_failure() {
        let fixture = Fixture::new(ScriptedProvider::default().failing("reviewer", "boom"));
        let orchestrator = fixture
            .orchestrator()
            .with_failure_mode(FailureMode::Strict)
            .with_dispatcher(Dispatcher::new(1).unwrap());

        let err = orchestrator
            .run_generation_batch("ship", "fp", &selection())
            .await
            .unwrap_err();

        match err {
            CrewError::Generation { item, .. } => assert_eq!(item, "agent:reviewer"),
            other => panic!("unexpected error: {other}"),
        }
        // Nothing scheduled after the failure
        assert_eq!(fixture.provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_an_item_failure() {
        let fixture = Fixture::new(
            ScriptedProvider::default().slow("docker", Duration::from_millis(200)),
        );
        let orchestrator = fixture.orchestrator().with_timeout(Duration::from_millis(20));

        let result = orchestrator
            .run_generation_batch(
                "ship",
                "fp",
                &ItemSelection::new().with_skills(["docker", "linting"]),
            )
            .await
            .unwrap();

        assert_eq!(names(&result.completed), vec!["linting"]);
        assert_eq!(result.failed[0].name, "docker");
        assert_eq!(result.failed[0].error.category, ErrorCategory::Network);
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_call() {
        let fixture = Fixture::new(ScriptedProvider::default());
        let orchestrator = fixture.orchestrator();

        for (goal, fp, selection) in [
            ("  ", "fp", selection()),
            ("ship", "", selection()),
            ("ship", "fp", ItemSelection::new()),
            ("ship", "fp", ItemSelection::new().with_hooks(["lint", "lint"])),
        ] {
            let err = orchestrator
                .run_generation_batch(goal, fp, &selection)
                .await
                .unwrap_err();
            assert!(matches!(err, CrewError::Validation(_)));
        }

        let err = orchestrator
            .run_generation_batch("", "fp", &selection())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CrewError::Validation(ValidationError {
                kind: ValidationErrorKind::MissingField,
                ..
            })
        ));
        assert!(fixture.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dispatched_tiers_match_estimate() {
        let fixture = Fixture::new(ScriptedProvider::default());
        let policy = TierPolicy {
            global: Some(ModelTier::Low),
            ..TierPolicy::default()
        };
        let orchestrator = fixture.orchestrator().with_policy(policy.clone());
        let selection = ItemSelection::new()
            .with_agents(["architect", "reviewer"])
            .with_skills(["linting", "docker", "security", "bespoke"])
            .with_hooks(["pre-push"])
            .with_overview(true);

        let result = orchestrator
            .run_generation_batch("ship", "fp", &selection)
            .await
            .unwrap();

        let planned: Vec<(String, ModelTier)> = CostEstimator::default()
            .plan(&selection, &policy)
            .into_iter()
            .map(|call| (call.name, call.tier))
            .collect();
        let dispatched: Vec<(String, ModelTier)> = result
            .completed
            .iter()
            .map(|item| (item.name.clone(), item.tier))
            .collect();
        assert_eq!(planned, dispatched);

        let mut called = fixture.provider.calls();
        called.sort();
        let mut expected = planned.clone();
        expected.sort();
        assert_eq!(called, expected);
    }

    #[tokio::test]
    async fn test_progress_events() {
        let fixture = Fixture::new(ScriptedProvider::default().failing("docker", "boom"));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink_events = Arc::clone(&events);
        let orchestrator = fixture
            .orchestrator()
            .with_dispatcher(Dispatcher::new(1).unwrap())
            .with_progress(Arc::new(move |event: &ProgressEvent| {
                sink_events.lock().unwrap().push(event.clone());
            }));

        orchestrator
            .run_generation_batch("ship", "fp", &ItemSelection::new().with_skills(["linting"]))
            .await
            .unwrap();
        orchestrator
            .run_generation_batch(
                "ship",
                "fp",
                &ItemSelection::new().with_skills(["linting", "docker"]),
            )
            .await
            .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                ProgressEvent::Generated {
                    label: "skill:linting".to_string(),
                    tier: ModelTier::Low,
                    completed: 1,
                    total: 1,
                },
                ProgressEvent::CacheHit {
                    label: "skill:linting".to_string(),
                    tier: ModelTier::Low,
                },
                ProgressEvent::Failed {
                    label: "skill:docker".to_string(),
                    error: "[scripted:UNKNOWN] boom".to_string(),
                    completed: 1,
                    total: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_disabled_cache_always_calls() {
        let provider = Arc::new(ScriptedProvider::default());
        let orchestrator =
            GenerationOrchestrator::new(Arc::new(CacheStore::disabled()), provider.clone());
        let selection = ItemSelection::new().with_hooks(["lint"]);

        for _ in 0..2 {
            let result = orchestrator
                .run_generation_batch("ship", "fp", &selection)
                .await
                .unwrap();
            assert_eq!(result.cache_misses, 1);
        }
        assert_eq!(provider.calls().len(), 2);
    }

    #[test]
    fn test_from_config_rejects_bad_concurrency() {
        let mut config = Config::default();
        config.generation.concurrency = 0;
        let result = GenerationOrchestrator::from_config(
            &config,
            Arc::new(CacheStore::disabled()),
            Arc::new(ScriptedProvider::default()),
        );
        assert!(matches!(result, Err(CrewError::Config(_))));
    }
}
