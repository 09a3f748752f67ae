// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded project scanner.
//!
//! Walks a directory breadth-first in name order, skipping hidden entries and
//! build output, and returns at most `max_files` recognized source files with
//! contents truncated to `max_bytes`.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use switchyard_config::model::ToolsConfig;
use switchyard_core::{ProjectFile, ProjectScanner, SwitchyardError};
use tracing::debug;

use crate::truncate_at_char_boundary;

const SKIPPED_DIRS: &[&str] = &["target", "node_modules", "dist", "build", "__pycache__", "venv"];

const LANGUAGES: &[(&str, &str)] = &[
    ("rs", "rust"),
    ("py", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("go", "go"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "c++"),
    ("cc", "c++"),
    ("hpp", "c++"),
    ("cs", "c#"),
    ("rb", "ruby"),
    ("php", "php"),
    ("swift", "swift"),
    ("sh", "shell"),
    ("sql", "sql"),
    ("toml", "toml"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("html", "html"),
    ("css", "css"),
];

/// Detected language for `path`, by extension.
pub fn language_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, language)| *language)
}

#[derive(Debug, Clone)]
pub struct LocalProjectScanner {
    max_files: usize,
    max_bytes: usize,
}

impl LocalProjectScanner {
    pub fn new(max_files: usize, max_bytes: usize) -> Self {
        Self {
            max_files,
            max_bytes,
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.scan_max_files, config.scan_max_bytes)
    }
}

fn scan_err(root: &Path, e: std::io::Error) -> SwitchyardError {
    SwitchyardError::Collaborator {
        collaborator: "project scanner".to_string(),
        message: format!("cannot scan '{}': {e}", root.display()),
        source: Some(Box::new(e)),
    }
}

async fn sorted_entries(dir: &Path) -> std::io::Result<Vec<(PathBuf, bool)>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let is_dir = entry.file_type().await?.is_dir();
        entries.push((entry.path(), is_dir));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ProjectScanner for LocalProjectScanner {
    async fn scan(&self, root: &Path) -> Result<Vec<ProjectFile>, SwitchyardError> {
        let metadata = tokio::fs::metadata(root).await.map_err(|e| scan_err(root, e))?;
        if !metadata.is_dir() {
            return Err(SwitchyardError::collaborator(
                "project scanner",
                format!("'{}' is not a directory", root.display()),
            ));
        }

        let mut files = Vec::new();
        let mut queue = VecDeque::from([root.to_path_buf()]);

        while let Some(dir) = queue.pop_front() {
            let entries = match sorted_entries(&dir).await {
                Ok(entries) => entries,
                // The root must be readable; unreadable subdirectories are skipped.
                Err(e) if dir == root => return Err(scan_err(root, e)),
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                    continue;
                }
            };

            for (path, is_dir) in entries {
                let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                if name.starts_with('.') {
                    continue;
                }
                if is_dir {
                    if !SKIPPED_DIRS.contains(&name.as_ref()) {
                        queue.push_back(path);
                    }
                    continue;
                }

                let Some(language) = language_for(&path) else {
                    continue;
                };
                let Ok(bytes) = tokio::fs::read(&path).await else {
                    continue;
                };
                let Ok(text) = String::from_utf8(bytes) else {
                    continue;
                };

                files.push(ProjectFile {
                    relative_path: relative(root, &path),
                    language: language.to_string(),
                    content: truncate_at_char_boundary(&text, self.max_bytes).to_string(),
                });
                if files.len() >= self.max_files {
                    debug!(root = %root.display(), files = files.len(), "scan limit reached");
                    return Ok(files);
                }
            }
        }

        debug!(root = %root.display(), files = files.len(), "project scanned");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn scans_source_files_with_languages() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Cargo.toml", "[package]");
        write(dir.path(), "src/main.rs", "fn main() {}");
        write(dir.path(), "src/util.py", "print(1)");
        write(dir.path(), "image.png", "not text");
        write(dir.path(), ".git/config", "[core]");
        write(dir.path(), "target/debug/out.rs", "// build output");

        let files = LocalProjectScanner::new(50, 4096).scan(dir.path()).await.unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["Cargo.toml", "src/main.rs", "src/util.py"]);
        assert_eq!(files[1].language, "rust");
        assert_eq!(files[2].language, "python");
        assert_eq!(files[1].content, "fn main() {}");
    }

    #[tokio::test]
    async fn respects_file_and_byte_limits() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            write(dir.path(), &format!("f{i}.rs"), &"a".repeat(100));
        }

        let files = LocalProjectScanner::new(3, 10).scan(dir.path()).await.unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.content.len() == 10));
    }

    #[tokio::test]
    async fn missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalProjectScanner::new(5, 10)
            .scan(&dir.path().join("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchyardError::Collaborator { .. }));
    }

    #[test]
    fn language_detection_is_case_insensitive() {
        assert_eq!(language_for(Path::new("Main.RS")), Some("rust"));
        assert_eq!(language_for(Path::new("Makefile")), None);
    }
}
