// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend-first intent classification with keyword fallback.

use std::sync::Arc;

use switchyard_core::{
    ChatMessage, Complexity, IntentRecord, IntentType, SwitchyardError, TaskContext, TaskType,
    Urgency,
};
use switchyard_executor::TaskExecutor;
use tracing::debug;

use crate::keywords::KeywordClassifier;
use crate::parse::parse_intent_output;
use crate::phrases;

/// Instructions for the classifying model, naming every subtype and entity
/// key the handlers act on.
fn classifier_prompt() -> String {
    let commands: Vec<_> = phrases::command_keys().collect();
    format!(
        "Classify the user's message. Reply with one JSON object and nothing else: \
{{\"type\": one of search|coding|automation|analysis|conversational|system, \
\"subtype\": optional string, \"entities\": object of string values, \"confidence\": number from 0 to 1}}.\n\
Subtypes: search is web or code. coding is generation, debugging or analysis. \
automation is command or file. analysis is project or general. \
conversational is memory_recall when the user asks you to remember or recall something. \
system is status.\n\
Entity keys: language, path, query, command_line, operation (create, read or delete), content, \
and command, which must be one of {}.",
        commands.join(", ")
    )
}

/// Maps a raw message to an [`IntentRecord`].
///
/// Never fails. Backend errors and unparseable output both resolve through the
/// keyword rules. A parsed model record is reconciled with what the keyword
/// rules see in the message, so recall and debugging requests route the same
/// way whichever path classified them.
pub struct IntentClassifier {
    executor: Option<Arc<TaskExecutor>>,
    keywords: KeywordClassifier,
    prompt: String,
}

impl IntentClassifier {
    pub fn new(executor: Arc<TaskExecutor>) -> Self {
        Self {
            executor: Some(executor),
            keywords: KeywordClassifier::new(),
            prompt: classifier_prompt(),
        }
    }

    /// A classifier that never calls a backend.
    pub fn keyword_only() -> Self {
        Self {
            executor: None,
            keywords: KeywordClassifier::new(),
            prompt: String::new(),
        }
    }

    pub async fn classify(&self, message: &str) -> IntentRecord {
        let Some(executor) = &self.executor else {
            return self.keywords.classify(message);
        };

        let context = TaskContext::new(TaskType::Analytical)
            .with_complexity(Complexity::Simple)
            .with_urgency(Urgency::High);
        let messages = [
            ChatMessage::system(self.prompt.as_str()),
            ChatMessage::user(message),
        ];

        let outcome = executor
            .execute_task(&messages, &context, None)
            .await
            .and_then(|result| {
                let record = parse_intent_output(&result.response).into_result()?;
                Ok((record, result.model))
            });

        match outcome {
            Ok((record, model)) => {
                debug!(
                    intent = %record.intent_type,
                    confidence = record.confidence,
                    model = model.as_str(),
                    "intent classified by model"
                );
                self.reconcile(record, message)
            }
            Err(SwitchyardError::ClassificationParse(raw)) => {
                debug!(raw_len = raw.len(), "classifier output unparseable, using keyword rules");
                self.keywords.classify(message)
            }
            Err(e) => {
                debug!(error = %e, "classifier backend failed, using keyword rules");
                self.keywords.classify(message)
            }
        }
    }

    /// Fills in the subtype and entities a model record left out.
    ///
    /// The model's type and confidence stand. When the keyword rules agree on
    /// the type, their subtype and entities fill the gaps. Recall triggers,
    /// debugging words, command phrases and paths are then checked against the
    /// message directly.
    fn reconcile(&self, mut record: IntentRecord, message: &str) -> IntentRecord {
        let heuristic = self.keywords.classify(message);
        if heuristic.intent_type == record.intent_type {
            if record.subtype.is_none() {
                record.subtype = heuristic.subtype;
            }
            for (key, value) in heuristic.entities {
                record.entities.entry(key).or_insert(value);
            }
        }

        match record.intent_type {
            IntentType::Conversational => {
                if phrases::is_recall(message) {
                    record.subtype = Some("memory_recall".to_string());
                    if let Some(query) = phrases::recall_query(message) {
                        record.entities.entry("query".to_string()).or_insert(query);
                    }
                }
            }
            IntentType::Coding => {
                if phrases::mentions_debugging(message) {
                    record.subtype = Some("debugging".to_string());
                }
            }
            IntentType::Automation => {
                let known = record
                    .entity("command")
                    .is_some_and(|key| phrases::command_keys().any(|k| k == key));
                if !known && let Some(key) = phrases::recognize_command(message) {
                    record.entities.insert("command".to_string(), key.to_string());
                }
                if let Some(request) = phrases::parse_file_request(message) {
                    record.subtype = Some("file".to_string());
                    record
                        .entities
                        .entry("operation".to_string())
                        .or_insert_with(|| request.op.as_str().to_string());
                    record.entities.entry("path".to_string()).or_insert(request.path);
                }
            }
            IntentType::Analysis => {
                if record.entity("path").is_none()
                    && let Some(path) = phrases::extract_path(message)
                {
                    record.entities.insert("path".to_string(), path);
                    record.subtype.get_or_insert_with(|| "project".to_string());
                }
            }
            IntentType::Search | IntentType::System => {}
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use switchyard_config::SwitchyardConfig;
    use switchyard_config::model::ExecutorConfig;
    use switchyard_core::{IntentSource, IntentType, ModelDescriptor, QualityClass, SpeedClass};
    use switchyard_router::{ModelRegistry, ModelSelector};
    use switchyard_test_utils::MockBackend;

    use super::*;

    fn classifier(backend: &MockBackend) -> IntentClassifier {
        let registry = Arc::new(ModelRegistry::new());
        registry.register(ModelDescriptor {
            name: "fast-model".to_string(),
            provider: "mock".to_string(),
            capabilities: vec!["speed".to_string()],
            max_tokens: 1024,
            cost_per_token: 0.0,
            speed: SpeedClass::Fast,
            quality: QualityClass::Medium,
        })
        .unwrap();
        let config = SwitchyardConfig::default();
        let executor = TaskExecutor::new(
            registry,
            ModelSelector::new(config.selector),
            &ExecutorConfig {
                fallback_model: None,
                timeout_secs: 5,
            },
        )
        .with_backend(Arc::new(backend.clone()));
        IntentClassifier::new(Arc::new(executor))
    }

    #[tokio::test]
    async fn uses_model_output_when_parseable() {
        let backend = MockBackend::new();
        backend.add_response("fast-model", r#"{"type":"automation","entities":{"command":"open_browser"},"confidence":0.9}"#);

        let record = classifier(&backend).classify("get me a browser window").await;
        assert_eq!(record.intent_type, IntentType::Automation);
        assert_eq!(record.entity("command"), Some("open_browser"));
        assert_eq!(record.source, IntentSource::Model);

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].messages.len(), 2);
        assert_eq!(calls[0].messages[1].content, "get me a browser window");
    }

    #[tokio::test]
    async fn unparseable_output_falls_back_to_keywords() {
        let backend = MockBackend::new();
        let record = classifier(&backend).classify("open calculator").await;
        assert_eq!(record.intent_type, IntentType::Automation);
        assert_eq!(record.source, IntentSource::Heuristic);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn backend_failure_falls_back_to_keywords() {
        let backend = MockBackend::new().failing_model("fast-model");
        let record = classifier(&backend).classify("search for rust tutorials").await;
        assert_eq!(record.intent_type, IntentType::Search);
        assert_eq!(record.source, IntentSource::Heuristic);
    }

    #[tokio::test]
    async fn keyword_only_never_calls_backend() {
        let record = IntentClassifier::keyword_only().classify("hello there").await;
        assert_eq!(record.intent_type, IntentType::Conversational);
        assert_eq!(record.confidence, 0.5);
    }

    #[tokio::test]
    async fn prompt_names_subtypes_and_command_keys() {
        let backend = MockBackend::new();
        backend.add_response("fast-model", r#"{"type":"system"}"#);
        classifier(&backend).classify("how are things").await;

        let prompt = &backend.calls()[0].messages[0].content;
        for word in ["memory_recall", "debugging", "file", "command_line", "open_calculator", "system_info"] {
            assert!(prompt.contains(word), "prompt is missing {word}");
        }
    }

    #[tokio::test]
    async fn bare_conversational_record_still_recalls() {
        let backend = MockBackend::new();
        backend.add_response("fast-model", r#"{"type":"conversational","confidence":0.9}"#);

        let record = classifier(&backend)
            .classify("remember what we discussed about pricing")
            .await;
        assert_eq!(record.intent_type, IntentType::Conversational);
        assert_eq!(record.subtype.as_deref(), Some("memory_recall"));
        assert_eq!(record.entity("query"), Some("we discussed about pricing"));
        assert_eq!(record.source, IntentSource::Model);
        assert!((record.confidence - 0.9).abs() < 1e-6);
    }

    #[tokio::test]
    async fn coding_record_picks_up_debugging_and_language() {
        let backend = MockBackend::new();
        backend.add_response("fast-model", r#"{"type":"coding","subtype":"generation"}"#);

        let record = classifier(&backend).classify("fix this bug in my python script").await;
        assert_eq!(record.subtype.as_deref(), Some("debugging"));
        assert_eq!(record.entity("language"), Some("python"));
    }

    #[tokio::test]
    async fn automation_record_gets_known_command_key_and_file_details() {
        let backend = MockBackend::new();
        backend.add_response("fast-model", r#"{"type":"automation","entities":{"command":"calculator"}}"#);
        backend.add_response("fast-model", r#"{"type":"automation","subtype":"command"}"#);
        let classifier = classifier(&backend);

        let record = classifier.classify("bring up the calculator").await;
        assert_eq!(record.entity("command"), Some("open_calculator"));

        let record = classifier.classify("read file notes/todo.md").await;
        assert_eq!(record.subtype.as_deref(), Some("file"));
        assert_eq!(record.entity("operation"), Some("read"));
        assert_eq!(record.entity("path"), Some("notes/todo.md"));
    }

    #[tokio::test]
    async fn model_type_wins_over_keyword_type() {
        let backend = MockBackend::new();
        backend.add_response("fast-model", r#"{"type":"system","subtype":"status"}"#);

        // keyword rules alone would call this a search
        let record = classifier(&backend).classify("look up how you are doing").await;
        assert_eq!(record.intent_type, IntentType::System);
        assert_eq!(record.subtype.as_deref(), Some("status"));
        assert!(record.entities.is_empty());
    }
}
