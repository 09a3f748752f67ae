// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end orchestrator tests.
//!
//! `TestHarness` assembles a registry, executor, memory store in a temp
//! SQLite file, and an orchestrator whose collaborators are all mocks.
//! Classification uses the keyword rules unless the builder asks for the
//! model-backed classifier, so backend call counts stay predictable.

use std::sync::Arc;
use std::time::Duration;

use switchyard_config::model::{ExecutorConfig, SelectorConfig};
use switchyard_core::{
    ModelDescriptor, ProjectFile, QualityClass, SearchResult, SpeedClass, SwitchyardError,
};
use switchyard_executor::TaskExecutor;
use switchyard_intent::IntentClassifier;
use switchyard_memory::MemoryStore;
use switchyard_orchestrator::{Orchestrator, ProcessRequest, ProcessResponse};
use switchyard_router::{ModelRegistry, ModelSelector};
use switchyard_tools::{CommandCatalog, Platform};

use crate::mock_backend::MockBackend;
use crate::mock_tools::{MockCommandRunner, MockFileOps, MockProjectScanner, MockWebSearch};

/// Name of the harness's default primary model.
pub const PRIMARY_MODEL: &str = "primary-model";
/// Name of the harness's default fallback model.
pub const BACKUP_MODEL: &str = "backup-model";

/// A descriptor served by the `mock` provider.
pub fn mock_model(name: &str, capabilities: &[&str], cost_per_token: f64) -> ModelDescriptor {
    ModelDescriptor {
        name: name.to_string(),
        provider: "mock".to_string(),
        capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        max_tokens: 4096,
        cost_per_token,
        speed: SpeedClass::Medium,
        quality: QualityClass::Medium,
    }
}

fn default_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor {
            quality: QualityClass::High,
            ..mock_model(PRIMARY_MODEL, &["general", "coding", "reasoning", "analysis"], 0.000_01)
        },
        ModelDescriptor {
            speed: SpeedClass::Fast,
            quality: QualityClass::Low,
            ..mock_model(BACKUP_MODEL, &["speed"], 0.000_001)
        },
    ]
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    models: Vec<ModelDescriptor>,
    fallback: Option<String>,
    model_classifier: bool,
    disabled: Vec<String>,
    search_results: Vec<SearchResult>,
    project_files: Vec<ProjectFile>,
    history_window: usize,
    recall_limit: usize,
    timeout: Duration,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            models: default_models(),
            fallback: Some(BACKUP_MODEL.to_string()),
            model_classifier: false,
            disabled: Vec::new(),
            search_results: Vec::new(),
            project_files: Vec::new(),
            history_window: 6,
            recall_limit: 5,
            timeout: Duration::from_secs(5),
        }
    }

    /// Replace the default `primary-model` / `backup-model` pair.
    pub fn with_models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = models;
        self
    }

    /// Set the fallback model. `None` disables fallback.
    pub fn with_fallback(mut self, fallback: Option<&str>) -> Self {
        self.fallback = fallback.map(str::to_string);
        self
    }

    /// Classify through the mock backend instead of the keyword rules.
    pub fn with_model_classifier(mut self) -> Self {
        self.model_classifier = true;
        self
    }

    pub fn with_disabled_capability(mut self, name: &str) -> Self {
        self.disabled.push(name.to_string());
        self
    }

    pub fn with_search_results(mut self, results: Vec<SearchResult>) -> Self {
        self.search_results = results;
        self
    }

    pub fn with_project_files(mut self, files: Vec<ProjectFile>) -> Self {
        self.project_files = files;
        self
    }

    pub fn with_history_window(mut self, turns: usize) -> Self {
        self.history_window = turns;
        self
    }

    pub fn with_recall_limit(mut self, limit: usize) -> Self {
        self.recall_limit = limit;
        self
    }

    /// Set the per-invocation backend timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SwitchyardError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| SwitchyardError::Storage {
            source: Box::new(e),
        })?;
        let memory = Arc::new(MemoryStore::open(temp_dir.path().join("memory.db")).await?);

        let registry = Arc::new(ModelRegistry::new());
        for model in self.models {
            registry.register(model)?;
        }

        let backend = MockBackend::new();
        let executor_config = ExecutorConfig {
            fallback_model: self.fallback,
            ..ExecutorConfig::default()
        };
        let executor = Arc::new(
            TaskExecutor::new(
                Arc::clone(&registry),
                ModelSelector::new(SelectorConfig::default()),
                &executor_config,
            )
            .with_backend(Arc::new(backend.clone()))
            .with_timeout(self.timeout),
        );

        let search = MockWebSearch::with_results(self.search_results);
        let shell = MockCommandRunner::new();
        let files = MockFileOps::new();
        let scanner = MockProjectScanner::with_files(self.project_files);

        let classifier = if self.model_classifier {
            IntentClassifier::new(Arc::clone(&executor))
        } else {
            IntentClassifier::keyword_only()
        };

        let orchestrator = Orchestrator::builder(Arc::clone(&executor), Arc::clone(&memory))
            .classifier(classifier)
            .web_search(Arc::new(search.clone()))
            .command_runner(Arc::new(shell.clone()))
            .file_ops(Arc::new(files.clone()))
            .project_scanner(Arc::new(scanner.clone()))
            .command_catalog(CommandCatalog::for_platform(Platform::Linux))
            .agent_name("test-agent")
            .history_window(self.history_window)
            .recall_limit(self.recall_limit)
            .disabled_capabilities(self.disabled)
            .build()?;

        Ok(TestHarness {
            orchestrator: Arc::new(orchestrator),
            backend,
            search,
            shell,
            files,
            scanner,
            memory,
            registry,
            executor,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete orchestrator stack over mocks and a temp memory database.
pub struct TestHarness {
    pub orchestrator: Arc<Orchestrator>,
    /// Shared with the executor; script responses and failures here.
    pub backend: MockBackend,
    pub search: MockWebSearch,
    pub shell: MockCommandRunner,
    pub files: MockFileOps,
    pub scanner: MockProjectScanner,
    pub memory: Arc<MemoryStore>,
    pub registry: Arc<ModelRegistry>,
    pub executor: Arc<TaskExecutor>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default models, keyword classification, and all capabilities.
    pub async fn new() -> Result<Self, SwitchyardError> {
        Self::builder().build().await
    }

    /// Send a plain message through the full request pipeline.
    pub async fn send(&self, message: &str) -> Result<ProcessResponse, SwitchyardError> {
        self.orchestrator
            .process_request(ProcessRequest::new(message))
            .await
    }

    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessResponse, SwitchyardError> {
        self.orchestrator.process_request(request).await
    }
}
