// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Priority-ordered keyword rules.
//!
//! Rules are checked in a fixed order and the first match wins:
//! search, coding, automation, analysis, memory recall, system. A message
//! matching none of them is conversational with confidence 0.5.

use switchyard_core::{IntentRecord, IntentSource, IntentType};

use crate::phrases;

const SEARCH_KEYWORDS: &[&str] = &[
    "search for",
    "search the web",
    "look up",
    "google",
    "find information",
    "latest news",
    "browse",
];

const CODING_KEYWORDS: &[&str] = &[
    "code",
    "function",
    "debug",
    "bug",
    "program",
    "script",
    "compile",
    "refactor",
    "implement",
    "algorithm",
    "stack trace",
];

const CODE_ANALYSIS_KEYWORDS: &[&str] = &["review", "explain", "analyze"];

const AUTOMATION_KEYWORDS: &[&str] = &[
    "open ",
    "launch ",
    "run ",
    "execute ",
    "screenshot",
    "create file",
    "read file",
    "delete file",
    "list files",
];

const ANALYSIS_KEYWORDS: &[&str] = &[
    "analyze",
    "analyse",
    "compare",
    "statistics",
    "evaluate",
    "project structure",
];

const SYSTEM_KEYWORDS: &[&str] = &["system status", "health check", "show stats", "capabilities"];

/// Language names recognized as a `language` entity, with their canonical form.
const LANGUAGES: &[(&str, &str)] = &[
    ("rust", "rust"),
    ("python", "python"),
    ("javascript", "javascript"),
    ("js", "javascript"),
    ("typescript", "typescript"),
    ("ts", "typescript"),
    ("java", "java"),
    ("golang", "go"),
    ("go", "go"),
    ("c++", "c++"),
    ("cpp", "c++"),
    ("c#", "c#"),
    ("csharp", "c#"),
    ("ruby", "ruby"),
    ("php", "php"),
    ("swift", "swift"),
    ("kotlin", "kotlin"),
    ("sql", "sql"),
    ("bash", "bash"),
    ("haskell", "haskell"),
];

const RULE_CONFIDENCE: f32 = 0.8;
const WEAK_RULE_CONFIDENCE: f32 = 0.7;
const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Deterministic classifier used when the backend path is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, message: &str) -> IntentRecord {
        let lower = message.to_lowercase();
        let has = |set: &[&str]| set.iter().any(|k| lower.contains(k));

        if has(SEARCH_KEYWORDS) {
            let record = heuristic(IntentType::Search, RULE_CONFIDENCE);
            return if has(CODING_KEYWORDS) {
                with_language(record.with_subtype("code"), &lower)
            } else {
                record.with_subtype("web")
            };
        }

        if has(CODING_KEYWORDS) {
            let subtype = if phrases::mentions_debugging(message) {
                "debugging"
            } else if has(CODE_ANALYSIS_KEYWORDS) {
                "analysis"
            } else {
                "generation"
            };
            return with_language(
                heuristic(IntentType::Coding, RULE_CONFIDENCE).with_subtype(subtype),
                &lower,
            );
        }

        if has(AUTOMATION_KEYWORDS) {
            return automation(message);
        }

        if has(ANALYSIS_KEYWORDS) {
            let record = heuristic(IntentType::Analysis, WEAK_RULE_CONFIDENCE);
            return match phrases::extract_path(message) {
                Some(path) => record.with_subtype("project").with_entity("path", path),
                None => record.with_subtype("general"),
            };
        }

        if let Some(query) = phrases::recall_query(message) {
            return heuristic(IntentType::Conversational, WEAK_RULE_CONFIDENCE)
                .with_subtype("memory_recall")
                .with_entity("query", query);
        }

        if has(SYSTEM_KEYWORDS) {
            return heuristic(IntentType::System, WEAK_RULE_CONFIDENCE).with_subtype("status");
        }

        heuristic(IntentType::Conversational, DEFAULT_CONFIDENCE)
    }
}

fn heuristic(intent_type: IntentType, confidence: f32) -> IntentRecord {
    IntentRecord::new(intent_type, confidence, IntentSource::Heuristic)
}

fn automation(message: &str) -> IntentRecord {
    let record = heuristic(IntentType::Automation, RULE_CONFIDENCE);

    if let Some(request) = phrases::parse_file_request(message) {
        return record
            .with_subtype("file")
            .with_entity("operation", request.op.as_str())
            .with_entity("path", request.path);
    }
    if phrases::is_file_phrase(message) {
        return record.with_subtype("file");
    }
    if let Some(command) = phrases::parse_run_command(message) {
        let record = record.with_subtype("command").with_entity("command_line", command.clone());
        return match phrases::recognize_command(&command) {
            Some(key) => record.with_entity("command", key),
            None => record,
        };
    }
    match phrases::recognize_command(message) {
        Some(key) => record.with_subtype("command").with_entity("command", key),
        None => record,
    }
}

/// Attaches a `language` entity when a known language name appears as a word.
fn with_language(record: IntentRecord, lower: &str) -> IntentRecord {
    let found = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .find_map(|word| {
            LANGUAGES
                .iter()
                .find(|(name, _)| *name == word)
                .map(|(_, canonical)| *canonical)
        });
    match found {
        Some(language) => record.with_entity("language", language),
        None => record,
    }
}
