// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring from configuration to a ready orchestrator.

use std::collections::BTreeSet;
use std::sync::Arc;

use switchyard_config::SwitchyardConfig;
use switchyard_core::SwitchyardError;
use switchyard_executor::TaskExecutor;
use switchyard_memory::MemoryStore;
use switchyard_openai::OpenAiBackend;
use switchyard_orchestrator::Orchestrator;
use switchyard_router::{ModelRegistry, ModelSelector};
use switchyard_tools::{
    CommandCatalog, LocalFileOps, LocalProjectScanner, MultiSearch, ShellRunner,
};
use tracing::info;

/// Opens the configured memory database, or a private in-memory one.
pub async fn open_memory(
    config: &SwitchyardConfig,
    ephemeral: bool,
) -> Result<MemoryStore, SwitchyardError> {
    if ephemeral {
        MemoryStore::open_in_memory().await
    } else {
        MemoryStore::open(&config.memory.database_path).await
    }
}

/// Builds the model stack and every collaborator described by `config`.
///
/// The `[backend]` endpoint speaks the OpenAI-compatible wire format and is
/// registered once per provider tag used by `[[models]]`.
pub async fn build_orchestrator(
    config: &SwitchyardConfig,
    ephemeral: bool,
) -> Result<Orchestrator, SwitchyardError> {
    let memory = Arc::new(open_memory(config, ephemeral).await?);
    let registry = Arc::new(ModelRegistry::from_config(&config.models)?);

    let backend = OpenAiBackend::from_config(&config.backend)?;
    let providers: BTreeSet<&str> = config.models.iter().map(|m| m.provider.as_str()).collect();
    let mut executor = TaskExecutor::new(
        Arc::clone(&registry),
        ModelSelector::new(config.selector.clone()),
        &config.executor,
    );
    for provider in &providers {
        executor = executor.with_backend(Arc::new(backend.clone().with_provider(*provider)));
    }
    let executor = Arc::new(executor);

    let orchestrator = Orchestrator::builder(executor, memory)
        .web_search(Arc::new(MultiSearch::from_config(&config.tools)?))
        .command_runner(Arc::new(ShellRunner::from_config(&config.tools)))
        .file_ops(Arc::new(LocalFileOps::new()))
        .project_scanner(Arc::new(LocalProjectScanner::from_config(&config.tools)))
        .command_catalog(CommandCatalog::default())
        .agent_name(config.agent.name.clone())
        .history_window(config.agent.history_window)
        .recall_limit(config.memory.recall_limit)
        .disabled_capabilities(config.capabilities.disabled.iter().cloned())
        .build()?;

    info!(
        models = registry.len(),
        providers = providers.len(),
        ephemeral,
        "orchestrator ready"
    );
    Ok(orchestrator)
}
