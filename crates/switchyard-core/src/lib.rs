// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Switchyard model router.
//!
//! This crate provides the error taxonomy, the domain types passed between the
//! registry, selector, executor, classifier, and orchestrator, and the traits
//! implemented by backends and helper collaborators.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SwitchyardError;
pub use types::{
    ChatMessage, ChatRole, CommandOutput, Complexity, ExecutionResult, HealthStatus,
    IntentRecord, IntentSource, IntentType, ModelDescriptor, ProjectFile, QualityClass,
    SearchResult, SpeedClass, TaskContext, TaskType, Urgency, UsageStats,
};

pub use traits::{CommandRunner, FileOps, ModelBackend, ProjectScanner, WebSearch};
