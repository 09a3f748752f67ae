// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured parsing of classifier backend output.

use std::collections::BTreeMap;

use serde::Deserialize;
use switchyard_core::{IntentRecord, IntentSource, IntentType, SwitchyardError};

/// Confidence assumed when the model omits one.
const DEFAULT_MODEL_CONFIDENCE: f32 = 0.7;

/// Outcome of parsing one classifier response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedIntent {
    Parsed(IntentRecord),
    /// The raw text that could not be interpreted.
    Unparseable(String),
}

impl ParsedIntent {
    pub fn into_result(self) -> Result<IntentRecord, SwitchyardError> {
        match self {
            ParsedIntent::Parsed(record) => Ok(record),
            ParsedIntent::Unparseable(raw) => Err(SwitchyardError::ClassificationParse(raw)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(alias = "intent")]
    #[serde(rename = "type")]
    intent_type: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    entities: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    confidence: Option<f32>,
}

/// Parses the first JSON object in `raw` into an [`IntentRecord`].
///
/// Models often wrap JSON in prose or code fences, so everything outside the
/// outermost braces is ignored.
pub fn parse_intent_output(raw: &str) -> ParsedIntent {
    let unparseable = || ParsedIntent::Unparseable(raw.to_string());

    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return unparseable();
    };
    if end < start {
        return unparseable();
    }

    let Ok(parsed) = serde_json::from_str::<RawIntent>(&raw[start..=end]) else {
        return unparseable();
    };
    let Some(intent_type) = intent_type_from_label(&parsed.intent_type) else {
        return unparseable();
    };

    let confidence = parsed
        .confidence
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_MODEL_CONFIDENCE)
        .clamp(0.0, 1.0);

    let mut record = IntentRecord::new(intent_type, confidence, IntentSource::Model);
    record.subtype = parsed
        .subtype
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    record.entities = parsed
        .entities
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect();

    ParsedIntent::Parsed(record)
}

fn intent_type_from_label(label: &str) -> Option<IntentType> {
    let label = label.trim().to_lowercase();
    match label.as_str() {
        "chat" | "general" | "conversation" => Some(IntentType::Conversational),
        "code" | "programming" => Some(IntentType::Coding),
        "analytical" | "analyze" => Some(IntentType::Analysis),
        "web_search" | "web" => Some(IntentType::Search),
        other => other.parse().ok(),
    }
}
