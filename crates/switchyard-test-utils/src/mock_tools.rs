// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborators for search, shell, file, and project-scan calls.
//!
//! Each mock records what it was asked to do and can be switched into a
//! failing mode to exercise handler error paths.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use switchyard_core::{
    CommandOutput, CommandRunner, FileOps, ProjectFile, ProjectScanner, SearchResult,
    SwitchyardError, WebSearch,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// --- Web search ---

#[derive(Debug, Default)]
struct SearchState {
    results: Vec<SearchResult>,
    queries: Vec<String>,
    code_queries: Vec<(String, Option<String>)>,
    fail: bool,
}

/// Returns the same canned results for every query.
#[derive(Debug, Clone, Default)]
pub struct MockWebSearch {
    state: Arc<Mutex<SearchState>>,
}

impl MockWebSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<SearchResult>) -> Self {
        let mock = Self::new();
        lock(&mock.state).results = results;
        mock
    }

    pub fn set_failing(&self, fail: bool) {
        lock(&self.state).fail = fail;
    }

    pub fn queries(&self) -> Vec<String> {
        lock(&self.state).queries.clone()
    }

    pub fn code_queries(&self) -> Vec<(String, Option<String>)> {
        lock(&self.state).code_queries.clone()
    }
}

/// Convenience constructor for a search hit.
pub fn search_result(title: &str, url: &str) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        url: url.to_string(),
        snippet: format!("About {title}"),
        source: "mock".to_string(),
    }
}

#[async_trait]
impl WebSearch for MockWebSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SwitchyardError> {
        let mut state = lock(&self.state);
        state.queries.push(query.to_string());
        if state.fail {
            return Err(SwitchyardError::collaborator("web search", "search backend offline"));
        }
        Ok(state.results.clone())
    }

    async fn search_code(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Result<Vec<SearchResult>, SwitchyardError> {
        let mut state = lock(&self.state);
        state
            .code_queries
            .push((query.to_string(), language.map(str::to_string)));
        if state.fail {
            return Err(SwitchyardError::collaborator("code search", "search backend offline"));
        }
        Ok(state.results.clone())
    }
}

// --- Shell ---

#[derive(Debug, Default)]
struct ShellState {
    commands: Vec<(String, Option<PathBuf>)>,
    outputs: HashMap<String, CommandOutput>,
    fail_spawn: bool,
}

/// Records commands and answers with scripted or successful empty output.
#[derive(Debug, Clone, Default)]
pub struct MockCommandRunner {
    state: Arc<Mutex<ShellState>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_output(&self, command: &str, output: CommandOutput) {
        lock(&self.state).outputs.insert(command.to_string(), output);
    }

    pub fn set_fail_spawn(&self, fail: bool) {
        lock(&self.state).fail_spawn = fail;
    }

    pub fn commands(&self) -> Vec<String> {
        lock(&self.state)
            .commands
            .iter()
            .map(|(c, _)| c.clone())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn execute_command(
        &self,
        command: &str,
        cwd: Option<&Path>,
    ) -> Result<CommandOutput, SwitchyardError> {
        let mut state = lock(&self.state);
        state
            .commands
            .push((command.to_string(), cwd.map(Path::to_path_buf)));
        if state.fail_spawn {
            return Err(SwitchyardError::collaborator("shell", "failed to spawn"));
        }
        Ok(state.outputs.get(command).cloned().unwrap_or(CommandOutput {
            success: true,
            output: String::new(),
            error: None,
        }))
    }
}

// --- Files ---

/// A file system held in a map.
#[derive(Debug, Clone, Default)]
pub struct MockFileOps {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MockFileOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, content: &str) {
        lock(&self.files).insert(PathBuf::from(path), content.to_string());
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        lock(&self.files).get(Path::new(path)).cloned()
    }
}

#[async_trait]
impl FileOps for MockFileOps {
    async fn create_file(&self, path: &Path, content: &str) -> Result<(), SwitchyardError> {
        lock(&self.files).insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<String, SwitchyardError> {
        lock(&self.files).get(path).cloned().ok_or_else(|| {
            SwitchyardError::collaborator("file", format!("{} does not exist", path.display()))
        })
    }

    async fn delete_file(&self, path: &Path) -> Result<(), SwitchyardError> {
        lock(&self.files)
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| {
                SwitchyardError::collaborator("file", format!("{} does not exist", path.display()))
            })
    }
}

// --- Project scanner ---

/// Returns a fixed file list for every root.
#[derive(Debug, Clone, Default)]
pub struct MockProjectScanner {
    files: Arc<Mutex<Vec<ProjectFile>>>,
    roots: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockProjectScanner {
    pub fn with_files(files: Vec<ProjectFile>) -> Self {
        Self {
            files: Arc::new(Mutex::new(files)),
            roots: Arc::default(),
        }
    }

    pub fn scanned_roots(&self) -> Vec<PathBuf> {
        lock(&self.roots).clone()
    }
}

#[async_trait]
impl ProjectScanner for MockProjectScanner {
    async fn scan(&self, root: &Path) -> Result<Vec<ProjectFile>, SwitchyardError> {
        lock(&self.roots).push(root.to_path_buf());
        Ok(lock(&self.files).clone())
    }
}
