// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One handler per intent type.
//!
//! [`Orchestrator::dispatch`] matches exhaustively on [`IntentType`], so a new
//! intent type does not compile until it has a handler. Handlers return `Err`
//! only for failures the orchestrator turns into error text.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use switchyard_core::{
    ChatMessage, ChatRole, ExecutionResult, IntentRecord, IntentType, ProjectFile, SearchResult,
    SwitchyardError, TaskContext, TaskType,
};
use switchyard_intent::estimate_complexity;
use switchyard_intent::phrases::{
    FileOp, FileRequest, extract_path, parse_file_request, parse_run_command, recall_query,
    recognize_command, search_query,
};
use switchyard_memory::MemoryEntry;
use tracing::debug;

use crate::capabilities::{
    CODE_SEARCH, FILE_OPERATIONS, MEMORY_RECALL, PROJECT_ANALYSIS, SHELL_EXECUTION, SYSTEM_STATUS,
    WEB_SEARCH,
};
use crate::orchestrator::Orchestrator;
use crate::request::{Action, ActionKind, RequestContext};

/// `model_used` when a handler fails.
pub const ERROR_HANDLER: &str = "error-handler";
const SEARCH_LABEL: &str = "web-search";
const SHELL_LABEL: &str = "shell";
const FILES_LABEL: &str = "filesystem";
const SCANNER_LABEL: &str = "project-scanner";
const MEMORY_LABEL: &str = "memory";
const SYSTEM_LABEL: &str = "system";
const GATE_LABEL: &str = "capability-gate";

const DEBUG_PROMPT: &str = "You are an expert debugger. Find the root cause of the problem, \
explain it briefly, and show the corrected code.";
const REVIEW_PROMPT: &str = "You are a senior code reviewer. Explain what the code does and \
point out bugs or risky constructs.";
const GENERATE_PROMPT: &str = "You are an expert programmer. Write clean, working code with a \
short explanation.";
const ANALYSIS_PROMPT: &str = "You are a careful analyst. Structure your answer with short \
sections and state your assumptions.";
const OFFLINE_SEARCH_PROMPT: &str = "Live web search is unavailable. Answer from your own \
knowledge and say when information may be out of date.";

/// Snippet length in memory recall listings.
const RECALL_PREVIEW_CHARS: usize = 120;

/// Everything a handler needs to know about the request in flight.
pub(crate) struct Scope<'a> {
    pub(crate) message: &'a str,
    pub(crate) intent: &'a IntentRecord,
    pub(crate) capabilities: &'a [String],
    pub(crate) context: &'a RequestContext,
}

impl Scope<'_> {
    fn has(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Resolves `path` against the caller's working directory, if any.
    fn resolve_path(&self, path: &str) -> PathBuf {
        match self.context.cwd.as_deref() {
            Some(cwd) => Path::new(cwd).join(path),
            None => PathBuf::from(path),
        }
    }
}

/// What a handler produced, before metadata is assembled.
#[derive(Debug, Clone)]
pub(crate) struct HandlerOutcome {
    pub(crate) response: String,
    pub(crate) actions: Vec<Action>,
    pub(crate) model_used: String,
    pub(crate) cost: f64,
    pub(crate) tokens: u64,
    pub(crate) success: bool,
    pub(crate) command_key: Option<String>,
}

impl HandlerOutcome {
    fn from_execution(result: ExecutionResult, mut actions: Vec<Action>) -> Self {
        actions.push(Action::new(ActionKind::ModelCall, result.model.clone(), true));
        Self {
            response: result.response,
            actions,
            model_used: result.model,
            cost: result.cost,
            tokens: result.tokens,
            success: true,
            command_key: None,
        }
    }

    fn tool(label: &str, response: String, actions: Vec<Action>, success: bool) -> Self {
        Self {
            response,
            actions,
            model_used: label.to_string(),
            cost: 0.0,
            tokens: 0,
            success,
            command_key: None,
        }
    }

    fn refused(capability: &str, what: &str) -> Self {
        Self::tool(
            GATE_LABEL,
            format!("I can't {what} right now because the `{capability}` capability is disabled."),
            Vec::new(),
            false,
        )
    }

    pub(crate) fn failure(error: &SwitchyardError) -> Self {
        let response = match error {
            SwitchyardError::BackendExecutionFailed { .. } | SwitchyardError::ModelNotAvailable { .. } => {
                format!("Sorry, no language model could answer that request. {error}")
            }
            SwitchyardError::Collaborator { collaborator, .. } => {
                format!("Sorry, the {collaborator} step failed. {error}")
            }
            _ => format!("Sorry, something went wrong while handling that request. {error}"),
        };
        Self::tool(ERROR_HANDLER, response, Vec::new(), false)
    }
}

impl Orchestrator {
    pub(crate) async fn dispatch(&self, scope: &Scope<'_>) -> Result<HandlerOutcome, SwitchyardError> {
        match scope.intent.intent_type {
            IntentType::Search => self.handle_search(scope).await,
            IntentType::Coding => self.handle_coding(scope).await,
            IntentType::Automation => self.handle_automation(scope).await,
            IntentType::Analysis => self.handle_analysis(scope).await,
            IntentType::Conversational => self.handle_conversational(scope).await,
            IntentType::System => self.handle_system(scope).await,
        }
    }

    fn task_context(&self, scope: &Scope<'_>, default_type: TaskType) -> TaskContext {
        let ctx = scope.context;
        let mut task = TaskContext::new(ctx.task_type.unwrap_or(default_type))
            .with_complexity(ctx.complexity.unwrap_or_else(|| estimate_complexity(scope.message)));
        if let Some(urgency) = ctx.urgency {
            task = task.with_urgency(urgency);
        }
        if let Some(language) = &ctx.language {
            task = task.with_language(language.clone());
        }
        if let Some(domain) = ctx.domain.as_deref().or(scope.intent.entity("language")) {
            task = task.with_domain(domain);
        }
        if let Some(preferred) = &ctx.preferred_model {
            task = task.with_preferred_model(preferred.clone());
        }
        task
    }

    async fn execute(
        &self,
        scope: &Scope<'_>,
        messages: &[ChatMessage],
        task_type: TaskType,
        actions: Vec<Action>,
    ) -> Result<HandlerOutcome, SwitchyardError> {
        let context = self.task_context(scope, task_type);
        let result = self
            .executor
            .execute_task(messages, &context, scope.context.model.as_deref())
            .await?;
        Ok(HandlerOutcome::from_execution(result, actions))
    }

    async fn ask_model(
        &self,
        scope: &Scope<'_>,
        system_prompt: Option<String>,
        task_type: TaskType,
    ) -> Result<HandlerOutcome, SwitchyardError> {
        let mut messages = Vec::with_capacity(2);
        messages.extend(system_prompt.map(ChatMessage::system));
        messages.push(ChatMessage::user(scope.message));
        self.execute(scope, &messages, task_type, Vec::new()).await
    }

    // --- search ---

    async fn handle_search(&self, scope: &Scope<'_>) -> Result<HandlerOutcome, SwitchyardError> {
        if !scope.has(WEB_SEARCH) {
            debug!("web_search not resolved, answering from a model");
            return self
                .ask_model(scope, Some(OFFLINE_SEARCH_PROMPT.to_string()), TaskType::Conversational)
                .await;
        }

        let query = search_query(scope.message);
        let (kind, results) = if scope.intent.subtype_is("code") && scope.has(CODE_SEARCH) {
            let language = scope.intent.entity("language");
            (ActionKind::CodeSearch, self.search.search_code(&query, language).await?)
        } else {
            (ActionKind::WebSearch, self.search.search(&query).await?)
        };

        let action = Action::new(kind, format!("{} results for \"{query}\"", results.len()), true);
        Ok(HandlerOutcome::tool(
            SEARCH_LABEL,
            format_search_results(&query, &results),
            vec![action],
            true,
        ))
    }

    // --- coding ---

    async fn handle_coding(&self, scope: &Scope<'_>) -> Result<HandlerOutcome, SwitchyardError> {
        let prompt = match scope.intent.subtype.as_deref() {
            Some("debugging") => Some(DEBUG_PROMPT),
            Some("analysis") => Some(REVIEW_PROMPT),
            Some("generation") => Some(GENERATE_PROMPT),
            _ => None,
        };
        let prompt = prompt.map(|p| match scope.intent.entity("language") {
            Some(language) => format!("{p} Use {language}."),
            None => p.to_string(),
        });
        self.ask_model(scope, prompt, TaskType::Coding).await
    }

    // --- automation ---

    async fn handle_automation(&self, scope: &Scope<'_>) -> Result<HandlerOutcome, SwitchyardError> {
        if !scope.has(SHELL_EXECUTION) {
            return Ok(HandlerOutcome::refused(SHELL_EXECUTION, "run commands"));
        }

        if let Some(request) = file_request(scope) {
            if !scope.has(FILE_OPERATIONS) {
                return Ok(HandlerOutcome::refused(FILE_OPERATIONS, "work with files"));
            }
            return self.run_file_request(scope, request).await;
        }

        let command_line = scope
            .intent
            .entity("command_line")
            .map(str::to_string)
            .or_else(|| parse_run_command(scope.message));
        if let Some(command_line) = command_line {
            return self.run_shell(scope, &command_line, None).await;
        }

        let key = scope
            .intent
            .entity("command")
            .filter(|key| self.catalog.resolve(key).is_some())
            .or_else(|| recognize_command(scope.message));
        if let Some(key) = key
            && let Some(command) = self.catalog.resolve(key)
        {
            return self.run_shell(scope, command, Some(key)).await;
        }

        let known: Vec<_> = self.catalog.keys().collect();
        Ok(HandlerOutcome::tool(
            SHELL_LABEL,
            format!(
                "I couldn't map that to a known command. Try `run <command>` or one of: {}.",
                known.join(", ")
            ),
            Vec::new(),
            false,
        ))
    }

    async fn run_shell(
        &self,
        scope: &Scope<'_>,
        command: &str,
        key: Option<&str>,
    ) -> Result<HandlerOutcome, SwitchyardError> {
        let cwd = scope.context.cwd.as_deref().map(Path::new);
        let output = self.shell.execute_command(command, cwd).await?;

        let label = match key {
            Some(key) => format!("`{key}` ({command})"),
            None => format!("`{command}`"),
        };
        let response = if output.success {
            let mut text = format!("Executed {label}.");
            let stdout = output.output.trim_end();
            if !stdout.is_empty() {
                let _ = write!(text, "\n\n{stdout}");
            }
            text
        } else {
            format!(
                "Command {label} failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            )
        };

        let mut outcome = HandlerOutcome::tool(
            SHELL_LABEL,
            response,
            vec![Action::new(ActionKind::ShellCommand, command, output.success)],
            output.success,
        );
        outcome.command_key = key.map(str::to_string);
        Ok(outcome)
    }

    async fn run_file_request(
        &self,
        scope: &Scope<'_>,
        request: FileRequest,
    ) -> Result<HandlerOutcome, SwitchyardError> {
        let path = scope.resolve_path(&request.path);
        let response = match request.op {
            FileOp::Create => {
                let content = request.content.as_deref().unwrap_or_default();
                self.files.create_file(&path, content).await?;
                format!("Created file {}.", request.path)
            }
            FileOp::Read => {
                let contents = self.files.read_file(&path).await?;
                format!("Contents of {}:\n\n{contents}", request.path)
            }
            FileOp::Delete => {
                self.files.delete_file(&path).await?;
                format!("Deleted file {}.", request.path)
            }
        };
        let action = Action::new(
            ActionKind::FileOperation,
            format!("{} {}", request.op.as_str(), path.display()),
            true,
        );
        Ok(HandlerOutcome::tool(FILES_LABEL, response, vec![action], true))
    }

    // --- analysis ---

    async fn handle_analysis(&self, scope: &Scope<'_>) -> Result<HandlerOutcome, SwitchyardError> {
        let path = scope
            .intent
            .entity("path")
            .map(str::to_string)
            .or_else(|| extract_path(scope.message));

        let Some(path) = path.filter(|_| scope.has(PROJECT_ANALYSIS)) else {
            return self
                .ask_model(scope, Some(ANALYSIS_PROMPT.to_string()), TaskType::Analytical)
                .await;
        };

        let files = self.scanner.scan(&scope.resolve_path(&path)).await?;
        let actions = vec![Action::new(
            ActionKind::ProjectScan,
            format!("{} files under {path}", files.len()),
            true,
        )];
        if files.is_empty() {
            return Ok(HandlerOutcome::tool(
                SCANNER_LABEL,
                format!("No source files found under {path}."),
                actions,
                true,
            ));
        }

        let messages = [
            ChatMessage::system(ANALYSIS_PROMPT),
            ChatMessage::user(format!("{}\n\n{}", scope.message, project_digest(&path, &files))),
        ];
        self.execute(scope, &messages, TaskType::Analytical, actions).await
    }

    // --- conversational ---

    async fn handle_conversational(&self, scope: &Scope<'_>) -> Result<HandlerOutcome, SwitchyardError> {
        if scope.intent.subtype_is("memory_recall") {
            if scope.has(MEMORY_RECALL) {
                return self.handle_recall(scope).await;
            }
            debug!("memory_recall not resolved, answering conversationally");
        }

        let mut turns = self.history.recent(self.settings.history_window + 1).await;
        // The newest turn is normally this request's own user turn.
        if turns
            .last()
            .is_some_and(|t| t.role == ChatRole::User && t.content == scope.message)
        {
            turns.pop();
        }
        let skip = turns.len().saturating_sub(self.settings.history_window);

        let mut preamble = format!(
            "You are {}, a helpful assistant. Answer concisely.",
            self.settings.agent_name
        );
        if skip < turns.len() {
            preamble.push_str("\n\nRecent conversation:");
            for turn in &turns[skip..] {
                let _ = write!(preamble, "\n{}: {}", turn.role, turn.content);
            }
        }

        self.ask_model(scope, Some(preamble), TaskType::Conversational).await
    }

    async fn handle_recall(&self, scope: &Scope<'_>) -> Result<HandlerOutcome, SwitchyardError> {
        let query = scope
            .intent
            .entity("query")
            .map(str::to_string)
            .or_else(|| recall_query(scope.message))
            .unwrap_or_default();
        let entries = self.memory.search(&query, self.settings.recall_limit).await?;

        let action = Action::new(
            ActionKind::MemorySearch,
            format!("{} matches for \"{query}\"", entries.len()),
            true,
        );
        Ok(HandlerOutcome::tool(
            MEMORY_LABEL,
            format_memories(&query, &entries),
            vec![action],
            true,
        ))
    }

    // --- system ---

    async fn handle_system(&self, scope: &Scope<'_>) -> Result<HandlerOutcome, SwitchyardError> {
        if !scope.has(SYSTEM_STATUS) {
            return Ok(HandlerOutcome::refused(SYSTEM_STATUS, "report system status"));
        }

        let models: Vec<String> = self.executor.registry().list().into_iter().map(|m| m.name).collect();
        let enabled = self.capabilities.enabled();
        let counts = self.memory.counts_by_type().await?;
        let stats = self.session_stats();

        let mut report = String::from("System status");
        let _ = write!(report, "\nModels ({}): {}", models.len(), models.join(", "));
        if let Some(fallback) = self.executor.fallback_model() {
            let _ = write!(report, "\nFallback model: {fallback}");
        }
        let _ = write!(report, "\nCapabilities enabled ({}): {}", enabled.len(), enabled.join(", "));
        let total: u64 = counts.values().sum();
        let breakdown: Vec<String> = counts.iter().map(|(kind, n)| format!("{kind}: {n}")).collect();
        let _ = write!(report, "\nMemory entries: {total}");
        if !breakdown.is_empty() {
            let _ = write!(report, " ({})", breakdown.join(", "));
        }
        let _ = write!(
            report,
            "\nSession: {} requests, {} successful ({:.1}%), {} tokens, cost {:.6}",
            stats.total_requests,
            stats.successful_requests,
            stats.success_rate * 100.0,
            stats.total_tokens,
            stats.total_cost
        );

        let action = Action::new(ActionKind::StatusReport, format!("{} models", models.len()), true);
        Ok(HandlerOutcome::tool(SYSTEM_LABEL, report, vec![action], true))
    }
}

/// The file request named by the message, or by a model-supplied record.
fn file_request(scope: &Scope<'_>) -> Option<FileRequest> {
    if let Some(request) = parse_file_request(scope.message) {
        return Some(request);
    }
    if !scope.intent.subtype_is("file") {
        return None;
    }
    let op = match scope.intent.entity("operation")? {
        "create" => FileOp::Create,
        "read" => FileOp::Read,
        "delete" => FileOp::Delete,
        _ => return None,
    };
    Some(FileRequest {
        op,
        path: scope.intent.entity("path")?.to_string(),
        content: scope.intent.entity("content").map(str::to_string),
    })
}

fn format_search_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\".");
    }
    let mut text = format!("Search results for \"{query}\":");
    for (i, result) in results.iter().enumerate() {
        let _ = write!(text, "\n{}. {} - {}", i + 1, result.title, result.url);
        if !result.snippet.is_empty() && result.snippet != result.title {
            let _ = write!(text, "\n   {}", result.snippet);
        }
    }
    text
}

fn format_memories(query: &str, entries: &[MemoryEntry]) -> String {
    if entries.is_empty() {
        return if query.is_empty() {
            "No memories stored yet.".to_string()
        } else {
            format!("No memories found for \"{query}\".")
        };
    }
    let mut text = if query.is_empty() {
        "Here are the most recent memories:".to_string()
    } else {
        format!("Here is what I remember about \"{query}\":")
    };
    for entry in entries {
        let _ = write!(
            text,
            "\n- [{}] {} -> {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            preview(&entry.input),
            preview(&entry.output)
        );
    }
    text
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= RECALL_PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(RECALL_PREVIEW_CHARS).collect();
        format!("{cut}...")
    }
}

/// File list and contents handed to the model for project analysis.
fn project_digest(path: &str, files: &[ProjectFile]) -> String {
    let mut languages: BTreeMap<&str, usize> = BTreeMap::new();
    for file in files {
        *languages.entry(file.language.as_str()).or_default() += 1;
    }
    let summary: Vec<String> = languages.iter().map(|(lang, n)| format!("{lang}: {n}")).collect();

    let mut digest = format!("Project at {path} ({} files; {}).", files.len(), summary.join(", "));
    for file in files {
        let _ = write!(
            digest,
            "\n\n--- {} ({}) ---\n{}",
            file.relative_path, file.language, file.content
        );
    }
    digest
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use switchyard_memory::{EntryType, MemoryMetadata};

    use super::*;

    fn entry(input: &str, output: &str) -> MemoryEntry {
        MemoryEntry {
            id: "1".into(),
            created_at: Utc::now(),
            entry_type: EntryType::Task,
            input: input.into(),
            output: output.into(),
            metadata: MemoryMetadata::default(),
        }
    }

    #[test]
    fn search_results_are_numbered() {
        let results = vec![SearchResult {
            title: "Tokio".into(),
            url: "https://tokio.rs".into(),
            snippet: "An async runtime".into(),
            source: "test".into(),
        }];
        let text = format_search_results("tokio", &results);
        assert!(text.starts_with("Search results for \"tokio\":"));
        assert!(text.contains("1. Tokio - https://tokio.rs"));
        assert!(text.contains("An async runtime"));
        assert_eq!(format_search_results("zz", &[]), "No results found for \"zz\".");
    }

    #[test]
    fn memories_format_with_empty_cases() {
        assert_eq!(format_memories("pricing", &[]), "No memories found for \"pricing\".");
        assert_eq!(format_memories("", &[]), "No memories stored yet.");

        let text = format_memories("pricing", &[entry("what about pricing", "Pricing is tiered")]);
        assert!(text.contains("what about pricing -> Pricing is tiered"));
    }

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("a\n  b"), "a b");
        let long = "x".repeat(RECALL_PREVIEW_CHARS + 5);
        assert!(preview(&long).ends_with("..."));
    }

    #[test]
    fn digest_lists_languages() {
        let files = vec![
            ProjectFile { relative_path: "src/main.rs".into(), language: "rust".into(), content: "fn main() {}".into() },
            ProjectFile { relative_path: "build.py".into(), language: "python".into(), content: "print()".into() },
        ];
        let digest = project_digest("./app", &files);
        assert!(digest.starts_with("Project at ./app (2 files; python: 1, rust: 1)."));
        assert!(digest.contains("--- src/main.rs (rust) ---\nfn main() {}"));
    }

    #[test]
    fn failure_text_names_the_collaborator() {
        let outcome = HandlerOutcome::failure(&SwitchyardError::collaborator("web search", "offline"));
        assert_eq!(outcome.model_used, ERROR_HANDLER);
        assert_eq!(outcome.cost, 0.0);
        assert!(!outcome.success);
        assert!(outcome.response.contains("web search"));
    }
}
