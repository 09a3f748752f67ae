// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model registry, per-model usage tracking, and scoring-based model selection.

pub mod registry;
pub mod selector;
pub mod usage;

pub use registry::{ModelRegistry, RegistrySnapshot};
pub use selector::{ModelScore, ModelSelector};
pub use usage::UsageTracker;
