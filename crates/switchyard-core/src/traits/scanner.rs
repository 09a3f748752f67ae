// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Project scanner collaborator used by the analysis handler.

use std::path::Path;

use async_trait::async_trait;

use crate::error::SwitchyardError;
use crate::types::ProjectFile;

#[async_trait]
pub trait ProjectScanner: Send + Sync + 'static {
    /// Returns a bounded list of source files under `root`.
    async fn scan(&self, root: &Path) -> Result<Vec<ProjectFile>, SwitchyardError>;
}
