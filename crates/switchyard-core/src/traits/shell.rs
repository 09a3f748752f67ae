// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shell and file collaborators used by the automation handler.

use std::path::Path;

use async_trait::async_trait;

use crate::error::SwitchyardError;
use crate::types::CommandOutput;

/// Runs shell commands with a bounded wait.
///
/// A command that exits non-zero, is refused, or times out is reported through
/// [`CommandOutput::success`]. `Err` is reserved for failures to spawn at all.
#[async_trait]
pub trait CommandRunner: Send + Sync + 'static {
    async fn execute_command(
        &self,
        command: &str,
        cwd: Option<&Path>,
    ) -> Result<CommandOutput, SwitchyardError>;
}

/// Plain file operations.
#[async_trait]
pub trait FileOps: Send + Sync + 'static {
    async fn create_file(&self, path: &Path, content: &str) -> Result<(), SwitchyardError>;

    async fn read_file(&self, path: &Path) -> Result<String, SwitchyardError>;

    async fn delete_file(&self, path: &Path) -> Result<(), SwitchyardError>;
}
