// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shell command execution with a timeout and a fragment blocklist.
//!
//! Commands run via `bash -c` (`cmd /C` on Windows). A command containing
//! any blocked fragment is refused without spawning. Refusals, non-zero exits
//! and timeouts all come back as an unsuccessful [`CommandOutput`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use switchyard_config::model::ToolsConfig;
use switchyard_core::{CommandOutput, CommandRunner, SwitchyardError};
use tracing::{debug, warn};

pub struct ShellRunner {
    timeout: Duration,
    blocked: Vec<String>,
    default_cwd: Option<PathBuf>,
}

impl ShellRunner {
    pub fn new(timeout: Duration, blocked: Vec<String>) -> Self {
        Self {
            timeout,
            blocked: blocked.into_iter().map(|b| b.to_lowercase()).collect(),
            default_cwd: None,
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        let mut runner = Self::new(
            Duration::from_secs(config.shell_timeout_secs),
            config.blocked_commands.clone(),
        );
        runner.default_cwd = config.working_dir.as_ref().map(PathBuf::from);
        runner
    }

    /// The blocked fragment `command` contains, if any.
    pub fn blocked_fragment(&self, command: &str) -> Option<&str> {
        let lower = command.to_lowercase();
        self.blocked
            .iter()
            .find(|fragment| lower.contains(fragment.as_str()))
            .map(String::as_str)
    }

    fn build(&self, command: &str) -> tokio::process::Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut cmd = tokio::process::Command::new("cmd");
            cmd.arg("/C");
            cmd
        } else {
            let mut cmd = tokio::process::Command::new("bash");
            cmd.arg("-c");
            cmd
        };
        cmd.arg(command).kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn execute_command(
        &self,
        command: &str,
        cwd: Option<&Path>,
    ) -> Result<CommandOutput, SwitchyardError> {
        if let Some(fragment) = self.blocked_fragment(command) {
            warn!(command, fragment, "refusing blocked command");
            return Ok(CommandOutput::refused(format!(
                "command refused: contains blocked fragment `{fragment}`"
            )));
        }

        let mut cmd = self.build(command);
        if let Some(dir) = cwd.or(self.default_cwd.as_deref()) {
            cmd.current_dir(dir);
        }

        debug!(command, "executing shell command");
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| SwitchyardError::Collaborator {
                collaborator: "shell".to_string(),
                message: format!("failed to execute `{command}`: {e}"),
                source: Some(Box::new(e)),
            })?,
            Err(_) => {
                warn!(command, timeout = ?self.timeout, "shell command timed out");
                return Ok(CommandOutput {
                    success: false,
                    output: String::new(),
                    error: Some(format!("timed out after {:?}", self.timeout)),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput {
                success: true,
                output: stdout,
                error: (!stderr.trim().is_empty()).then_some(stderr),
            })
        } else {
            let exit_code = output.status.code().unwrap_or(-1);
            Ok(CommandOutput {
                success: false,
                output: stdout,
                error: Some(if stderr.trim().is_empty() {
                    format!("exit code {exit_code}")
                } else {
                    format!("exit code {exit_code}: {}", stderr.trim())
                }),
            })
        }
    }
}
