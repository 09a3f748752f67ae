// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the registry, selector, executor, classifier, and orchestrator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Language assumed when a task does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

// --- Model metadata ---

/// Relative response speed of a backend model. Ordered slow < medium < fast.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SpeedClass {
    Slow,
    Medium,
    Fast,
}

/// Relative output quality of a backend model. Ordered low < medium < high.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QualityClass {
    Low,
    Medium,
    High,
}

/// Static metadata for one callable backend model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Unique registry key.
    pub name: String,
    /// Provider tag used to find the backend instance.
    pub provider: String,
    /// Declared capability tags, e.g. "coding", "creative".
    pub capabilities: Vec<String>,
    pub max_tokens: u32,
    /// Relative cost per estimated token. Never negative.
    pub cost_per_token: f64,
    pub speed: SpeedClass,
    pub quality: QualityClass,
}

impl ModelDescriptor {
    /// Returns true if the model declares the given capability tag.
    pub fn has_capability(&self, tag: &str) -> bool {
        self.capabilities.iter().any(|c| c.eq_ignore_ascii_case(tag))
    }
}

/// Running statistics for one model, updated once per successful execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub requests: u64,
    pub tokens: u64,
    pub cost: f64,
    pub avg_latency_ms: f64,
}

impl UsageStats {
    /// Folds one completed execution into the running totals.
    ///
    /// The average is a true running mean over all recorded samples:
    /// `avg' = (avg * (n - 1) + sample) / n` with `n` the post-increment count.
    pub fn record(&mut self, latency_ms: f64, tokens: u64, cost: f64) {
        self.requests += 1;
        let n = self.requests as f64;
        self.avg_latency_ms = (self.avg_latency_ms * (n - 1.0) + latency_ms) / n;
        self.tokens += tokens;
        self.cost += cost;
    }
}

// --- Task description ---

/// Kind of work a task represents, used for affinity scoring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TaskType {
    Coding,
    Creative,
    Analytical,
    Conversational,
    System,
    Translation,
    Summarization,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Describes one unit of work for model scoring.
///
/// Built once per request with the `with_*` builders and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    pub task_type: TaskType,
    pub complexity: Complexity,
    pub urgency: Urgency,
    pub language: Option<String>,
    pub domain: Option<String>,
    /// Free-form model preference, matched as a substring of model names.
    pub preferred_model: Option<String>,
}

impl TaskContext {
    /// Creates a context with medium complexity and urgency.
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            complexity: Complexity::Medium,
            urgency: Urgency::Medium,
            language: None,
            domain: None,
            preferred_model: None,
        }
    }

    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_preferred_model(mut self, preferred: impl Into<String>) -> Self {
        self.preferred_model = Some(preferred.into());
        self
    }

    /// True when a target language other than the default is requested.
    pub fn wants_non_default_language(&self) -> bool {
        self.language
            .as_deref()
            .is_some_and(|lang| !lang.trim().is_empty() && !lang.eq_ignore_ascii_case(DEFAULT_LANGUAGE))
    }
}

// --- Backend messages and results ---

/// Author role of a chat message sent to a backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in a backend request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Output of one successful backend invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub response: String,
    /// Model that actually produced the response (the fallback, if one was used).
    pub model: String,
    pub execution_time_ms: u64,
    pub tokens: u64,
    /// Always `tokens * cost_per_token` of `model`.
    pub cost: f64,
}

// --- Intent ---

/// Coarse handling category for a user message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IntentType {
    Search,
    Coding,
    Automation,
    Analysis,
    Conversational,
    System,
}

/// Where an intent record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IntentSource {
    /// Parsed from the classifier backend's structured output.
    Model,
    /// Produced by the local keyword rules.
    Heuristic,
}

/// Classification of one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub intent_type: IntentType,
    pub subtype: Option<String>,
    /// Extracted entities such as `language`, `path`, `command`, `query`.
    pub entities: BTreeMap<String, String>,
    pub confidence: f32,
    pub source: IntentSource,
}

impl IntentRecord {
    pub fn new(intent_type: IntentType, confidence: f32, source: IntentSource) -> Self {
        Self {
            intent_type,
            subtype: None,
            entities: BTreeMap::new(),
            confidence,
            source,
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_entity(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entities.insert(key.into(), value.into());
        self
    }

    pub fn subtype_is(&self, subtype: &str) -> bool {
        self.subtype.as_deref() == Some(subtype)
    }

    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }
}

// --- Collaborator payloads ---

/// One web or code search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source: String,
}

/// Outcome of a shell command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl CommandOutput {
    pub fn refused(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(reason.into()),
        }
    }
}

/// One file returned by a project scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub relative_path: String,
    pub language: String,
    /// File contents truncated to the scanner's byte limit.
    pub content: String,
}

/// Health status reported by backend health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}
