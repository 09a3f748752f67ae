// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the routing core.
//!
//! Every trait is object safe and uses `#[async_trait]` so the orchestrator
//! can hold collaborators as `Arc<dyn Trait>`.

pub mod backend;
pub mod scanner;
pub mod search;
pub mod shell;

pub use backend::ModelBackend;
pub use scanner::ProjectScanner;
pub use search::WebSearch;
pub use shell::{CommandRunner, FileOps};
