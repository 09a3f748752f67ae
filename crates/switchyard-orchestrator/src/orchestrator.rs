// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request FSM and the [`Orchestrator`] that drives it.
//!
//! Each request goes through states:
//! Received -> Classifying -> CapabilityResolution -> Dispatch -> Completed.
//! Nothing survives a request except the conversation history, the memory
//! log, usage stats, and the session counters.

use std::sync::Arc;
use std::time::Instant;

use switchyard_core::{
    ChatRole, CommandRunner, FileOps, IntentRecord, ProjectScanner, SwitchyardError, WebSearch,
};
use switchyard_executor::TaskExecutor;
use switchyard_intent::IntentClassifier;
use switchyard_memory::{ConversationHistory, ConversationTurn, EntryType, MemoryMetadata, MemoryStore};
use switchyard_router::ModelRegistry;
use switchyard_tools::CommandCatalog;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::capabilities::{CapabilityRegistry, CapabilityStatus};
use crate::handlers::{HandlerOutcome, Scope};
use crate::request::{ProcessRequest, ProcessResponse, ResponseMetadata};
use crate::stats::{RequestCounters, SessionStats};
use crate::suggestions::suggestions_for;

const DEFAULT_HISTORY_WINDOW: usize = 6;
const DEFAULT_RECALL_LIMIT: usize = 5;

/// States in the request FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Message accepted and appended to the conversation history.
    Received,
    /// Waiting on the intent classifier.
    Classifying,
    /// Mapping the intent to the enabled capability set.
    CapabilityResolution,
    /// Running the handler for the intent type.
    Dispatch,
    /// Assistant turn, memory entry, and suggestions recorded.
    Completed,
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestState::Received => write!(f, "received"),
            RequestState::Classifying => write!(f, "classifying"),
            RequestState::CapabilityResolution => write!(f, "capability_resolution"),
            RequestState::Dispatch => write!(f, "dispatch"),
            RequestState::Completed => write!(f, "completed"),
        }
    }
}

/// Settings that shape handler behaviour.
#[derive(Debug, Clone)]
pub(crate) struct HandlerSettings {
    pub(crate) agent_name: String,
    pub(crate) history_window: usize,
    pub(crate) recall_limit: usize,
}

/// Routes each message to a handler and records the outcome.
///
/// Shared by reference across concurrent requests. The conversation history
/// and the memory store serialize their own writes.
pub struct Orchestrator {
    pub(crate) executor: Arc<TaskExecutor>,
    pub(crate) classifier: IntentClassifier,
    pub(crate) capabilities: CapabilityRegistry,
    pub(crate) memory: Arc<MemoryStore>,
    pub(crate) history: ConversationHistory,
    pub(crate) search: Arc<dyn WebSearch>,
    pub(crate) shell: Arc<dyn CommandRunner>,
    pub(crate) files: Arc<dyn FileOps>,
    pub(crate) scanner: Arc<dyn ProjectScanner>,
    pub(crate) catalog: CommandCatalog,
    pub(crate) settings: HandlerSettings,
    counters: RequestCounters,
}

impl Orchestrator {
    pub fn builder(executor: Arc<TaskExecutor>, memory: Arc<MemoryStore>) -> OrchestratorBuilder {
        OrchestratorBuilder::new(executor, memory)
    }

    /// Runs one request through the FSM.
    ///
    /// Only an empty message is returned as `Err`. Every other failure is
    /// turned into response text with `metadata.success == false`.
    pub async fn process_request(
        &self,
        request: ProcessRequest,
    ) -> Result<ProcessResponse, SwitchyardError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(SwitchyardError::Validation(
                "message must not be empty".to_string(),
            ));
        }

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let mut state = RequestState::Received;
        self.history.push(ChatRole::User, message).await;

        // Transition: Received -> Classifying
        state = transition(request_id, state, RequestState::Classifying);
        let intent = self.classifier.classify(message).await;
        debug!(
            %request_id,
            intent = %intent.intent_type,
            subtype = intent.subtype.as_deref().unwrap_or("-"),
            confidence = intent.confidence,
            "intent classified"
        );

        // Transition: Classifying -> CapabilityResolution
        state = transition(request_id, state, RequestState::CapabilityResolution);
        let capabilities = self.capabilities.resolve(&intent, &request.capabilities);

        // Transition: CapabilityResolution -> Dispatch
        state = transition(request_id, state, RequestState::Dispatch);
        let context = request.context.unwrap_or_default();
        let scope = Scope {
            message,
            intent: &intent,
            capabilities: &capabilities,
            context: &context,
        };
        let outcome = match self.dispatch(&scope).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(%request_id, intent = %intent.intent_type, error = %e, "handler failed, returning error text");
                HandlerOutcome::failure(&e)
            }
        };

        // Transition: Dispatch -> Completed
        state = transition(request_id, state, RequestState::Completed);
        let execution_time_ms = started.elapsed().as_millis() as u64;
        self.history.push(ChatRole::Assistant, outcome.response.as_str()).await;
        self.remember(message, &intent, &capabilities, &outcome, execution_time_ms)
            .await;
        self.counters.record(outcome.success);

        info!(
            %request_id,
            %state,
            intent = %intent.intent_type,
            model = outcome.model_used.as_str(),
            success = outcome.success,
            execution_time_ms,
            "request completed"
        );

        Ok(build_response(outcome, intent, capabilities, execution_time_ms))
    }

    async fn remember(
        &self,
        message: &str,
        intent: &IntentRecord,
        capabilities: &[String],
        outcome: &HandlerOutcome,
        execution_time_ms: u64,
    ) {
        let mut tags = vec![intent.intent_type.to_string()];
        tags.extend(intent.subtype.clone());
        tags.extend(capabilities.iter().cloned());

        let metadata = MemoryMetadata {
            success: outcome.success,
            execution_time_ms,
            tags,
            command_key: outcome.command_key.clone(),
            agent: Some(outcome.model_used.clone()),
        };
        if let Err(e) = self
            .memory
            .append(EntryType::Task, message, &outcome.response, metadata)
            .await
        {
            warn!(error = %e, "failed to append memory entry");
        }
    }

    pub fn list_capabilities(&self) -> Vec<CapabilityStatus> {
        self.capabilities.list()
    }

    /// Toggles a capability. Unknown names are a validation error.
    pub fn set_capability_enabled(&self, name: &str, enabled: bool) -> Result<bool, SwitchyardError> {
        self.capabilities.set_enabled(name, enabled)
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.history.all().await
    }

    pub fn session_stats(&self) -> SessionStats {
        self.counters.snapshot(self.executor.registry().usage())
    }

    pub fn executor(&self) -> &Arc<TaskExecutor> {
        &self.executor
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        self.executor.registry()
    }

    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.memory
    }

    pub fn agent_name(&self) -> &str {
        &self.settings.agent_name
    }
}

fn transition(request_id: Uuid, from: RequestState, to: RequestState) -> RequestState {
    debug!(%request_id, %from, %to, "request state transition");
    to
}

fn build_response(
    outcome: HandlerOutcome,
    intent: IntentRecord,
    capabilities: Vec<String>,
    execution_time_ms: u64,
) -> ProcessResponse {
    ProcessResponse {
        response: outcome.response,
        actions: outcome.actions,
        suggestions: suggestions_for(intent.intent_type)
            .iter()
            .map(|s| s.to_string())
            .collect(),
        metadata: ResponseMetadata {
            model_used: outcome.model_used,
            execution_time_ms,
            cost: outcome.cost,
            tokens: outcome.tokens,
            capabilities,
            intent: intent.intent_type,
            subtype: intent.subtype,
            confidence: intent.confidence,
            success: outcome.success,
        },
    }
}

/// Wires an [`Orchestrator`]. All four collaborators are required.
pub struct OrchestratorBuilder {
    executor: Arc<TaskExecutor>,
    memory: Arc<MemoryStore>,
    classifier: Option<IntentClassifier>,
    search: Option<Arc<dyn WebSearch>>,
    shell: Option<Arc<dyn CommandRunner>>,
    files: Option<Arc<dyn FileOps>>,
    scanner: Option<Arc<dyn ProjectScanner>>,
    catalog: CommandCatalog,
    disabled: Vec<String>,
    settings: HandlerSettings,
}

impl OrchestratorBuilder {
    fn new(executor: Arc<TaskExecutor>, memory: Arc<MemoryStore>) -> Self {
        Self {
            executor,
            memory,
            classifier: None,
            search: None,
            shell: None,
            files: None,
            scanner: None,
            catalog: CommandCatalog::default(),
            disabled: Vec::new(),
            settings: HandlerSettings {
                agent_name: "switchyard".to_string(),
                history_window: DEFAULT_HISTORY_WINDOW,
                recall_limit: DEFAULT_RECALL_LIMIT,
            },
        }
    }

    /// Replaces the default model-backed classifier.
    pub fn classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn web_search(mut self, search: Arc<dyn WebSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn command_runner(mut self, shell: Arc<dyn CommandRunner>) -> Self {
        self.shell = Some(shell);
        self
    }

    pub fn file_ops(mut self, files: Arc<dyn FileOps>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn project_scanner(mut self, scanner: Arc<dyn ProjectScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn command_catalog(mut self, catalog: CommandCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn agent_name(mut self, name: impl Into<String>) -> Self {
        self.settings.agent_name = name.into();
        self
    }

    pub fn history_window(mut self, turns: usize) -> Self {
        self.settings.history_window = turns;
        self
    }

    pub fn recall_limit(mut self, limit: usize) -> Self {
        self.settings.recall_limit = limit;
        self
    }

    /// Capabilities that start disabled.
    pub fn disabled_capabilities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<Orchestrator, SwitchyardError> {
        let missing = |what: &str| SwitchyardError::Config(format!("orchestrator requires a {what}"));
        let capabilities = CapabilityRegistry::with_disabled(&self.disabled)
            .map_err(|e| SwitchyardError::Config(e.to_string()))?;
        let classifier = self
            .classifier
            .unwrap_or_else(|| IntentClassifier::new(Arc::clone(&self.executor)));

        Ok(Orchestrator {
            search: self.search.ok_or_else(|| missing("web search collaborator"))?,
            shell: self.shell.ok_or_else(|| missing("command runner"))?,
            files: self.files.ok_or_else(|| missing("file operations collaborator"))?,
            scanner: self.scanner.ok_or_else(|| missing("project scanner"))?,
            executor: self.executor,
            classifier,
            capabilities,
            memory: self.memory,
            history: ConversationHistory::new(),
            catalog: self.catalog,
            settings: self.settings,
            counters: RequestCounters::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_state_display() {
        assert_eq!(RequestState::Received.to_string(), "received");
        assert_eq!(
            RequestState::CapabilityResolution.to_string(),
            "capability_resolution"
        );
        assert_eq!(RequestState::Completed.to_string(), "completed");
    }
}
