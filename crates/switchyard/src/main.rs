// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchyard - a multi-model request router.
//!
//! This is the binary entry point: it loads configuration, wires the
//! orchestrator, and runs the selected subcommand.

mod app;
mod commands;
mod shell;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use switchyard_config::{ConfigError, SwitchyardConfig};
use switchyard_core::SwitchyardError;

/// Switchyard - routes messages to the best language model for the task.
#[derive(Parser, Debug)]
#[command(name = "switchyard", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep the memory log in memory for this run only.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one message and print the response.
    Ask {
        /// The message to route.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
        /// Force a specific model instead of letting the selector choose.
        #[arg(long)]
        model: Option<String>,
        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Launch an interactive REPL session.
    Shell,
    /// List registered models with their usage and backend health.
    Models {
        #[arg(long)]
        json: bool,
    },
    /// Inspect or clear the memory log.
    Memory {
        #[command(subcommand)]
        action: MemoryCommand,
    },
    /// Manage Switchyard configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum MemoryCommand {
    /// Show the newest entries.
    Recent {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Case-insensitive search over inputs and outputs.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Entry counts by type.
    Stats,
    /// Delete every entry.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the merged configuration and print a summary.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            switchyard_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli, config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: SwitchyardConfig) -> Result<(), SwitchyardError> {
    match cli.command {
        Some(Commands::Ask {
            message,
            model,
            json,
        }) => {
            let orchestrator = app::build_orchestrator(&config, cli.ephemeral).await?;
            commands::run_ask(&orchestrator, &message.join(" "), model, json).await
        }
        Some(Commands::Shell) => {
            let orchestrator = app::build_orchestrator(&config, cli.ephemeral).await?;
            shell::run_shell(&orchestrator).await
        }
        Some(Commands::Models { json }) => {
            let orchestrator = app::build_orchestrator(&config, cli.ephemeral).await?;
            commands::run_models(orchestrator.executor(), json).await
        }
        Some(Commands::Memory { action }) => {
            let store = app::open_memory(&config, cli.ephemeral).await?;
            match action {
                MemoryCommand::Recent { limit } => commands::run_memory_recent(&store, limit).await,
                MemoryCommand::Search { query, limit } => {
                    commands::run_memory_search(&store, &query.join(" "), limit).await
                }
                MemoryCommand::Stats => commands::run_memory_stats(&store).await,
                MemoryCommand::Clear { yes } => commands::run_memory_clear(&store, yes).await,
            }
        }
        Some(Commands::Config {
            action: ConfigCommand::Check,
        }) => {
            commands::run_config_check(&config);
            Ok(())
        }
        None => {
            println!("switchyard: use --help for available commands");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SwitchyardConfig, Vec<ConfigError>> {
    match path {
        Some(path) => switchyard_config::load_and_validate_path(path),
        None => switchyard_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchyard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_joins_words_and_takes_flags() {
        let cli = Cli::try_parse_from([
            "switchyard",
            "--ephemeral",
            "ask",
            "open",
            "calculator",
            "--model",
            "gpt-4o-mini",
        ])
        .unwrap();
        assert!(cli.ephemeral);
        match cli.command {
            Some(Commands::Ask { message, model, json }) => {
                assert_eq!(message.join(" "), "open calculator");
                assert_eq!(model.as_deref(), Some("gpt-4o-mini"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_requires_a_message() {
        assert!(Cli::try_parse_from(["switchyard", "ask"]).is_err());
    }

    #[test]
    fn memory_subcommands_parse() {
        let cli = Cli::try_parse_from(["switchyard", "memory", "search", "pricing", "-l", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Memory {
                action: MemoryCommand::Search { limit: 3, .. }
            })
        ));

        let cli = Cli::try_parse_from(["switchyard", "memory", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Memory {
                action: MemoryCommand::Clear { yes: false }
            })
        ));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["switchyard", "config", "check", "--config", "/tmp/s.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/s.toml")));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = switchyard_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "switchyard");
    }
}
