// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime capability toggles and intent-to-capability resolution.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use switchyard_core::{IntentRecord, IntentType, SwitchyardError};
use tracing::info;

pub const WEB_SEARCH: &str = "web_search";
pub const CODE_SEARCH: &str = "code_search";
pub const CODE_GENERATION: &str = "code_generation";
pub const CODE_ANALYSIS: &str = "code_analysis";
pub const DEBUGGING: &str = "debugging";
pub const SHELL_EXECUTION: &str = "shell_execution";
pub const FILE_OPERATIONS: &str = "file_operations";
pub const PROJECT_ANALYSIS: &str = "project_analysis";
pub const DATA_ANALYSIS: &str = "data_analysis";
pub const CONVERSATION: &str = "conversation";
pub const MEMORY_RECALL: &str = "memory_recall";
pub const SYSTEM_STATUS: &str = "system_status";

/// Every capability name, in lexicographic order.
pub const ALL_CAPABILITIES: &[&str] = &[
    CODE_ANALYSIS,
    CODE_GENERATION,
    CODE_SEARCH,
    CONVERSATION,
    DATA_ANALYSIS,
    DEBUGGING,
    FILE_OPERATIONS,
    MEMORY_RECALL,
    PROJECT_ANALYSIS,
    SHELL_EXECUTION,
    SYSTEM_STATUS,
    WEB_SEARCH,
];

/// One row of [`CapabilityRegistry::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityStatus {
    pub name: String,
    pub enabled: bool,
}

/// Capabilities an intent needs before caller requests and toggles apply.
pub fn capabilities_for(intent: &IntentRecord) -> BTreeSet<&'static str> {
    let has_path = intent.entity("path").is_some();
    let mut caps = BTreeSet::new();
    match intent.intent_type {
        IntentType::Search => {
            caps.insert(WEB_SEARCH);
            if intent.subtype_is("code") {
                caps.insert(CODE_SEARCH);
            }
        }
        IntentType::Coding => {
            caps.insert(CODE_GENERATION);
            caps.insert(CODE_ANALYSIS);
            if intent.subtype_is("debugging") {
                caps.insert(DEBUGGING);
            }
        }
        IntentType::Automation => {
            caps.insert(SHELL_EXECUTION);
            if intent.subtype_is("file") || has_path {
                caps.insert(FILE_OPERATIONS);
            }
        }
        IntentType::Analysis => {
            caps.insert(DATA_ANALYSIS);
            if has_path {
                caps.insert(PROJECT_ANALYSIS);
            }
        }
        IntentType::Conversational => {
            caps.insert(CONVERSATION);
            if intent.subtype_is("memory_recall") {
                caps.insert(MEMORY_RECALL);
            }
        }
        IntentType::System => {
            caps.insert(SYSTEM_STATUS);
        }
    }
    caps
}

/// Enabled flags for the fixed capability set. Safe to share across requests.
#[derive(Debug)]
pub struct CapabilityRegistry {
    enabled: RwLock<BTreeMap<&'static str, bool>>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self {
            enabled: RwLock::new(ALL_CAPABILITIES.iter().map(|c| (*c, true)).collect()),
        }
    }
}

impl CapabilityRegistry {
    /// All capabilities enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `disabled` switched off. Unknown names are rejected.
    pub fn with_disabled<S: AsRef<str>>(disabled: &[S]) -> Result<Self, SwitchyardError> {
        let registry = Self::new();
        for name in disabled {
            registry.set_enabled(name.as_ref(), false)?;
        }
        Ok(registry)
    }

    /// Toggles `name`. Returns the previous state.
    pub fn set_enabled(&self, name: &str, enabled: bool) -> Result<bool, SwitchyardError> {
        let key = canonical(name)?;
        let mut map = self.enabled.write().unwrap_or_else(PoisonError::into_inner);
        let previous = map.insert(key, enabled).unwrap_or(true);
        if previous != enabled {
            info!(capability = key, enabled, "capability toggled");
        }
        Ok(previous)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        let map = self.enabled.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name).copied().unwrap_or(false)
    }

    pub fn list(&self) -> Vec<CapabilityStatus> {
        let map = self.enabled.read().unwrap_or_else(PoisonError::into_inner);
        map.iter()
            .map(|(name, enabled)| CapabilityStatus {
                name: name.to_string(),
                enabled: *enabled,
            })
            .collect()
    }

    pub fn enabled(&self) -> Vec<String> {
        let map = self.enabled.read().unwrap_or_else(PoisonError::into_inner);
        map.iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// `(mapped ∪ requested) ∩ enabled`, sorted. Unknown requested names drop out.
    pub fn resolve(&self, intent: &IntentRecord, requested: &[String]) -> Vec<String> {
        let map = self.enabled.read().unwrap_or_else(PoisonError::into_inner);
        let mut wanted: BTreeSet<&str> = capabilities_for(intent).into_iter().collect();
        wanted.extend(requested.iter().map(String::as_str));
        wanted
            .into_iter()
            .filter(|name| map.get(name).copied().unwrap_or(false))
            .map(str::to_string)
            .collect()
    }
}

fn canonical(name: &str) -> Result<&'static str, SwitchyardError> {
    ALL_CAPABILITIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| {
            SwitchyardError::Validation(format!(
                "unknown capability `{name}` (expected one of: {})",
                ALL_CAPABILITIES.join(", ")
            ))
        })
}
