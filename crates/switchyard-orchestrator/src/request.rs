// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response types for [`Orchestrator::process_request`].
//!
//! [`Orchestrator::process_request`]: crate::Orchestrator::process_request

use serde::{Deserialize, Serialize};
use switchyard_core::{Complexity, IntentType, TaskType, Urgency};

/// One inbound request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<RequestContext>,
    /// Capability names the caller wants in addition to the intent's own.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl ProcessRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_capability(mut self, name: impl Into<String>) -> Self {
        self.capabilities.push(name.into());
        self
    }
}

/// Caller overrides applied to model-backed handlers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub task_type: Option<TaskType>,
    pub complexity: Option<Complexity>,
    pub urgency: Option<Urgency>,
    pub language: Option<String>,
    pub domain: Option<String>,
    /// Substring preference passed to the selector.
    pub preferred_model: Option<String>,
    /// Bypasses the selector entirely.
    pub model: Option<String>,
    /// Working directory for shell commands.
    pub cwd: Option<String>,
}

/// Kind of side effect a handler performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ModelCall,
    WebSearch,
    CodeSearch,
    ShellCommand,
    FileOperation,
    ProjectScan,
    MemorySearch,
    StatusReport,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::ModelCall => write!(f, "model_call"),
            ActionKind::WebSearch => write!(f, "web_search"),
            ActionKind::CodeSearch => write!(f, "code_search"),
            ActionKind::ShellCommand => write!(f, "shell_command"),
            ActionKind::FileOperation => write!(f, "file_operation"),
            ActionKind::ProjectScan => write!(f, "project_scan"),
            ActionKind::MemorySearch => write!(f, "memory_search"),
            ActionKind::StatusReport => write!(f, "status_report"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub detail: String,
    pub success: bool,
}

impl Action {
    pub fn new(kind: ActionKind, detail: impl Into<String>, success: bool) -> Self {
        Self {
            kind,
            detail: detail.into(),
            success,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Model that produced the answer, a collaborator label, or `error-handler`.
    pub model_used: String,
    pub execution_time_ms: u64,
    pub cost: f64,
    pub tokens: u64,
    /// Resolved capabilities, sorted.
    pub capabilities: Vec<String>,
    pub intent: IntentType,
    pub subtype: Option<String>,
    pub confidence: f32,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub response: String,
    pub actions: Vec<Action>,
    pub suggestions: Vec<String>,
    pub metadata: ResponseMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_with_optional_fields() {
        let req: ProcessRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.context.is_none());
        assert!(req.capabilities.is_empty());

        let req: ProcessRequest = serde_json::from_str(
            r#"{"message": "fix it", "context": {"task_type": "coding", "model": "gpt-4o"}, "capabilities": ["debugging"]}"#,
        )
        .unwrap();
        let ctx = req.context.unwrap();
        assert_eq!(ctx.task_type, Some(TaskType::Coding));
        assert_eq!(ctx.model.as_deref(), Some("gpt-4o"));
        assert_eq!(req.capabilities, vec!["debugging"]);
    }

    #[test]
    fn action_kind_display_matches_serde() {
        let json = serde_json::to_string(&ActionKind::ShellCommand).unwrap();
        assert_eq!(json, format!("\"{}\"", ActionKind::ShellCommand));
    }
}
