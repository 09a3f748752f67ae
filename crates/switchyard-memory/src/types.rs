// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of interaction a [`MemoryEntry`] records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryType {
    Conversation,
    Task,
    SystemCommand,
    Learning,
}

/// Free-form metadata stored alongside each entry as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryMetadata {
    pub success: bool,
    pub execution_time_ms: u64,
    pub tags: Vec<String>,
    /// Command catalog key, for automation entries.
    pub command_key: Option<String>,
    /// Model or agent that produced the output.
    pub agent: Option<String>,
}

/// One persisted interaction. Never mutated after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub entry_type: EntryType,
    pub input: String,
    pub output: String,
    pub metadata: MemoryMetadata,
}

impl MemoryEntry {
    /// Case-insensitive substring match over input and output.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.input.to_lowercase().contains(needle) || self.output.to_lowercase().contains(needle)
    }
}
