// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard shell` command implementation.
//!
//! Launches an interactive REPL with a colored prompt and readline history.
//! Plain lines go through the orchestrator; lines starting with `/` are
//! local commands for inspecting the session.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use switchyard_core::SwitchyardError;
use switchyard_orchestrator::{Orchestrator, ProcessRequest};

use crate::commands::{print_entries, print_response, print_stats};

/// Memory entries listed by `/memory`.
const MEMORY_LIST_LIMIT: usize = 10;

const HELP: &str = "\
/help                 show this help
/stats                session statistics
/models               registered models and usage
/history              conversation turns of this session
/capabilities         capability toggles
/enable <capability>  turn a capability on
/disable <capability> turn a capability off
/memory [query]       recent memory entries, or a search
/quit                 leave the shell";

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Help,
    Quit,
    Stats,
    Models,
    History,
    Capabilities,
    Toggle { name: &'a str, enabled: bool },
    Memory(Option<&'a str>),
    Usage(&'static str),
    Unknown(&'a str),
    Message(&'a str),
}

/// `None` for blank lines.
fn parse_line(line: &str) -> Option<ShellCommand<'_>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Some(ShellCommand::Message(trimmed));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    let command = match (name, arg) {
        ("help", _) => ShellCommand::Help,
        ("quit" | "exit", _) => ShellCommand::Quit,
        ("stats", _) => ShellCommand::Stats,
        ("models", _) => ShellCommand::Models,
        ("history", _) => ShellCommand::History,
        ("capabilities" | "caps", _) => ShellCommand::Capabilities,
        ("enable", Some(name)) => ShellCommand::Toggle { name, enabled: true },
        ("enable", None) => ShellCommand::Usage("/enable <capability>"),
        ("disable", Some(name)) => ShellCommand::Toggle { name, enabled: false },
        ("disable", None) => ShellCommand::Usage("/disable <capability>"),
        ("memory", query) => ShellCommand::Memory(query),
        _ => ShellCommand::Unknown(name),
    };
    Some(command)
}

/// Runs the `switchyard shell` interactive REPL.
pub async fn run_shell(orchestrator: &Orchestrator) -> Result<(), SwitchyardError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| SwitchyardError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "switchyard shell".bold().green());
    println!(
        "Type {} for commands, {} to exit.\n",
        "/help".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", orchestrator.agent_name().green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let Some(command) = parse_line(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(&line);

                if command == ShellCommand::Quit {
                    break;
                }
                if let Err(e) = handle(orchestrator, command).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    let stats = orchestrator.session_stats();
    if stats.total_requests > 0 {
        println!(
            "{}",
            format!(
                "session: {} requests, cost ${:.4}",
                stats.total_requests, stats.total_cost
            )
            .dimmed()
        );
    }
    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn handle(orchestrator: &Orchestrator, command: ShellCommand<'_>) -> Result<(), SwitchyardError> {
    match command {
        ShellCommand::Message(text) => {
            let response = orchestrator.process_request(ProcessRequest::new(text)).await?;
            print_response(&response);
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Stats => print_stats(&orchestrator.session_stats()),
        ShellCommand::Models => {
            let snapshot = orchestrator.registry().snapshot();
            for model in &snapshot.models {
                let requests = snapshot.usage.get(&model.name).map_or(0, |u| u.requests);
                println!(
                    "{}  {}  {} requests",
                    model.name.bold(),
                    model.provider.dimmed(),
                    requests
                );
            }
        }
        ShellCommand::History => {
            let turns = orchestrator.history().await;
            if turns.is_empty() {
                println!("{}", "no turns yet".dimmed());
            }
            for turn in turns {
                println!(
                    "{} {}: {}",
                    turn.timestamp.format("%H:%M:%S").to_string().dimmed(),
                    turn.role,
                    turn.content
                );
            }
        }
        ShellCommand::Capabilities => {
            for status in orchestrator.list_capabilities() {
                let mark = if status.enabled {
                    "on ".green()
                } else {
                    "off".red()
                };
                println!("  {mark} {}", status.name);
            }
        }
        ShellCommand::Toggle { name, enabled } => {
            let was = orchestrator.set_capability_enabled(name, enabled)?;
            let state = if enabled { "enabled" } else { "disabled" };
            if was == enabled {
                println!("{name} already {state}");
            } else {
                println!("{name} {state}");
            }
        }
        ShellCommand::Memory(query) => {
            let memory = orchestrator.memory();
            match query {
                Some(query) => print_entries(
                    &memory.search(query, MEMORY_LIST_LIMIT).await?,
                    &format!("no entries match \"{query}\""),
                ),
                None => print_entries(
                    &memory.recent(MEMORY_LIST_LIMIT).await?,
                    "memory log is empty",
                ),
            }
        }
        ShellCommand::Usage(usage) => println!("usage: {usage}"),
        ShellCommand::Unknown(name) => {
            println!("unknown command /{name}, type {} for a list", "/help".yellow());
        }
        ShellCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   \t"), None);
    }

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_line("  open calculator "),
            Some(ShellCommand::Message("open calculator"))
        );
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_line("/quit"), Some(ShellCommand::Quit));
        assert_eq!(parse_line("/exit"), Some(ShellCommand::Quit));
        assert_eq!(parse_line("/stats"), Some(ShellCommand::Stats));
        assert_eq!(parse_line("/caps"), Some(ShellCommand::Capabilities));
        assert_eq!(parse_line("/memory"), Some(ShellCommand::Memory(None)));
        assert_eq!(
            parse_line("/memory  pricing tiers "),
            Some(ShellCommand::Memory(Some("pricing tiers")))
        );
        assert_eq!(parse_line("/frobnicate"), Some(ShellCommand::Unknown("frobnicate")));
    }

    #[test]
    fn toggles_need_a_capability_name() {
        assert_eq!(
            parse_line("/disable web_search"),
            Some(ShellCommand::Toggle {
                name: "web_search",
                enabled: false
            })
        );
        assert_eq!(
            parse_line("/enable"),
            Some(ShellCommand::Usage("/enable <capability>"))
        );
    }
}
