// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local filesystem operations.
//!
//! Reads are truncated to keep responses small.

use std::path::Path;

use async_trait::async_trait;
use switchyard_core::{FileOps, SwitchyardError};
use tracing::debug;

use crate::truncate_at_char_boundary;

/// Maximum file read size in bytes (100KB).
const DEFAULT_MAX_READ: usize = 100 * 1024;

#[derive(Debug, Clone)]
pub struct LocalFileOps {
    max_read_bytes: usize,
}

impl Default for LocalFileOps {
    fn default() -> Self {
        Self {
            max_read_bytes: DEFAULT_MAX_READ,
        }
    }
}

impl LocalFileOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_read_bytes(mut self, max: usize) -> Self {
        self.max_read_bytes = max;
        self
    }
}

fn file_err(action: &str, path: &Path, e: std::io::Error) -> SwitchyardError {
    SwitchyardError::Collaborator {
        collaborator: "file".to_string(),
        message: format!("failed to {action} '{}': {e}", path.display()),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl FileOps for LocalFileOps {
    async fn create_file(&self, path: &Path, content: &str) -> Result<(), SwitchyardError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| file_err("create directory for", path, e))?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| file_err("write", path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "file written");
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<String, SwitchyardError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| file_err("read", path, e))?;

        if contents.len() > self.max_read_bytes {
            Ok(format!(
                "{}...\n\n[File truncated from {} to {} bytes]",
                truncate_at_char_boundary(&contents, self.max_read_bytes),
                contents.len(),
                self.max_read_bytes
            ))
        } else {
            Ok(contents)
        }
    }

    async fn delete_file(&self, path: &Path) -> Result<(), SwitchyardError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| file_err("delete", path, e))?;
        debug!(path = %path.display(), "file deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_read_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("notes.txt");
        let ops = LocalFileOps::new();

        ops.create_file(&path, "buy milk").await.unwrap();
        assert_eq!(ops.read_file(&path).await.unwrap(), "buy milk");

        ops.delete_file(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_file_is_collaborator_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFileOps::new()
            .read_file(&dir.path().join("absent.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchyardError::Collaborator { ref collaborator, .. } if collaborator == "file"));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[tokio::test]
    async fn large_reads_are_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "x".repeat(64)).unwrap();

        let content = LocalFileOps::new()
            .with_max_read_bytes(10)
            .read_file(&path)
            .await
            .unwrap();
        assert!(content.starts_with("xxxxxxxxxx..."));
        assert!(content.contains("truncated from 64 to 10 bytes"));
    }
}
