// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: `ask`, `models`, `memory` and `config check`.
//!
//! The printing helpers here are shared with the interactive shell.

use std::io::IsTerminal;

use colored::Colorize;
use switchyard_config::SwitchyardConfig;
use switchyard_core::{HealthStatus, SwitchyardError};
use switchyard_executor::TaskExecutor;
use switchyard_memory::{MemoryEntry, MemoryStore};
use switchyard_orchestrator::{
    Orchestrator, ProcessRequest, ProcessResponse, RequestContext, ResponseMetadata, SessionStats,
};

/// Characters of input or output shown per memory line.
const ENTRY_PREVIEW_CHARS: usize = 60;

/// Run `switchyard ask`.
pub async fn run_ask(
    orchestrator: &Orchestrator,
    message: &str,
    model: Option<String>,
    json: bool,
) -> Result<(), SwitchyardError> {
    let mut request = ProcessRequest::new(message);
    if model.is_some() {
        request = request.with_context(RequestContext {
            model,
            ..RequestContext::default()
        });
    }

    let response = orchestrator.process_request(request).await?;
    if json {
        println!("{}", to_json(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

/// Run `switchyard models`.
pub async fn run_models(executor: &TaskExecutor, json: bool) -> Result<(), SwitchyardError> {
    let snapshot = executor.registry().snapshot();
    let health = executor.backend_health().await;

    if json {
        let models: Vec<_> = snapshot
            .models
            .iter()
            .map(|m| {
                serde_json::json!({
                    "model": m,
                    "usage": snapshot.usage.get(&m.name),
                })
            })
            .collect();
        let backends: Vec<_> = health
            .iter()
            .map(|(provider, status)| {
                serde_json::json!({ "provider": provider, "status": health_label(status) })
            })
            .collect();
        let report = serde_json::json!({ "models": models, "backends": backends });
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    println!();
    println!("  {}", "models".bold());
    println!("  {}", "-".repeat(35));
    for model in &snapshot.models {
        let usage = snapshot.usage.get(&model.name).cloned().unwrap_or_default();
        println!(
            "    {}  {}  speed={} quality={} cost/token={}",
            model.name.bold(),
            model.provider.dimmed(),
            model.speed,
            model.quality,
            model.cost_per_token
        );
        println!("      capabilities: {}", model.capabilities.join(", "));
        println!(
            "      usage: {} requests, {} tokens, ${:.6}, avg {:.0} ms",
            usage.requests, usage.tokens, usage.cost, usage.avg_latency_ms
        );
    }
    if let Some(fallback) = executor.fallback_model() {
        println!("    fallback: {fallback}");
    }

    println!();
    println!("  {}", "backends".bold());
    println!("  {}", "-".repeat(35));
    let use_color = std::io::stdout().is_terminal();
    for (provider, status) in &health {
        let label = health_label(status);
        let label = match (status, use_color) {
            (HealthStatus::Healthy, true) => label.green().to_string(),
            (HealthStatus::Degraded(_), true) => label.yellow().to_string(),
            (HealthStatus::Unhealthy(_), true) => label.red().to_string(),
            (_, false) => label,
        };
        println!("    {provider}: {label}");
    }
    println!();
    Ok(())
}

/// Run `switchyard memory recent`.
pub async fn run_memory_recent(store: &MemoryStore, limit: usize) -> Result<(), SwitchyardError> {
    print_entries(&store.recent(limit).await?, "memory log is empty");
    Ok(())
}

/// Run `switchyard memory search`.
pub async fn run_memory_search(
    store: &MemoryStore,
    query: &str,
    limit: usize,
) -> Result<(), SwitchyardError> {
    let entries = store.search(query, limit).await?;
    print_entries(&entries, &format!("no entries match \"{query}\""));
    Ok(())
}

/// Run `switchyard memory stats`.
pub async fn run_memory_stats(store: &MemoryStore) -> Result<(), SwitchyardError> {
    let counts = store.counts_by_type().await?;
    let total: u64 = counts.values().sum();
    println!("{total} entries");
    for (entry_type, count) in &counts {
        println!("  {entry_type}: {count}");
    }
    Ok(())
}

/// Run `switchyard memory clear`.
pub async fn run_memory_clear(store: &MemoryStore, confirmed: bool) -> Result<(), SwitchyardError> {
    if !confirmed {
        return Err(SwitchyardError::Validation(
            "pass --yes to delete every memory entry".to_string(),
        ));
    }
    let removed = store.clear().await?;
    println!("removed {removed} entries");
    Ok(())
}

/// Run `switchyard config check`. Only reached once loading and validation passed.
pub fn run_config_check(config: &SwitchyardConfig) {
    println!("{} configuration is valid", "ok:".green());
    println!("  agent:     {}", config.agent.name);
    println!("  models:    {}", config.models.len());
    println!(
        "  fallback:  {}",
        config.executor.fallback_model.as_deref().unwrap_or("none")
    );
    println!("  backend:   {}", config.backend.base_url);
    println!("  memory:    {}", config.memory.database_path);
    if !config.capabilities.disabled.is_empty() {
        println!("  disabled:  {}", config.capabilities.disabled.join(", "));
    }
}

pub fn print_response(response: &ProcessResponse) {
    if response.metadata.success {
        println!("{}", response.response);
    } else {
        println!("{}", response.response.yellow());
    }
    if !response.suggestions.is_empty() {
        println!("{}", format!("try: {}", response.suggestions.join(" | ")).dimmed());
    }
    println!("{}", format_metadata(&response.metadata).dimmed());
}

pub fn print_stats(stats: &SessionStats) {
    println!(
        "{} requests, {} successful ({:.1}%)",
        stats.total_requests,
        stats.successful_requests,
        stats.success_rate * 100.0
    );
    println!("{} tokens, ${:.6}", stats.total_tokens, stats.total_cost);
    for (model, requests) in &stats.requests_per_model {
        println!("  {model}: {requests}");
    }
}

pub fn print_entries(entries: &[MemoryEntry], empty: &str) {
    if entries.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    for entry in entries {
        println!("{}", format_entry(entry));
    }
}

/// `model | 12 ms | 40 tokens | $0.000400 | search/web (0.80)`
pub fn format_metadata(metadata: &ResponseMetadata) -> String {
    let intent = match &metadata.subtype {
        Some(subtype) => format!("{}/{subtype}", metadata.intent),
        None => metadata.intent.to_string(),
    };
    format!(
        "{} | {} ms | {} tokens | ${:.6} | {intent} ({:.2})",
        metadata.model_used,
        metadata.execution_time_ms,
        metadata.tokens,
        metadata.cost,
        metadata.confidence
    )
}

pub fn format_entry(entry: &MemoryEntry) -> String {
    let id: String = entry.id.chars().take(8).collect();
    format!(
        "{id}  {}  [{}]  {} -> {}",
        entry.created_at.format("%Y-%m-%d %H:%M:%S"),
        entry.entry_type,
        truncate(&entry.input, ENTRY_PREVIEW_CHARS),
        truncate(&entry.output, ENTRY_PREVIEW_CHARS)
    )
}

fn health_label(status: &HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => "healthy".to_string(),
        HealthStatus::Degraded(reason) => format!("degraded ({reason})"),
        HealthStatus::Unhealthy(reason) => format!("unhealthy ({reason})"),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, SwitchyardError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| SwitchyardError::Internal(format!("failed to serialize output: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use switchyard_core::IntentType;
    use switchyard_memory::{EntryType, MemoryMetadata};

    use super::*;

    fn metadata(subtype: Option<&str>) -> ResponseMetadata {
        ResponseMetadata {
            model_used: "gpt-4o-mini".to_string(),
            execution_time_ms: 12,
            cost: 0.0004,
            tokens: 40,
            capabilities: vec!["web_search".to_string()],
            intent: IntentType::Search,
            subtype: subtype.map(str::to_string),
            confidence: 0.8,
            success: true,
        }
    }

    #[test]
    fn metadata_line_includes_subtype() {
        assert_eq!(
            format_metadata(&metadata(Some("web"))),
            "gpt-4o-mini | 12 ms | 40 tokens | $0.000400 | search/web (0.80)"
        );
        assert!(format_metadata(&metadata(None)).ends_with("| search (0.80)"));
    }

    #[test]
    fn entry_line_truncates_long_text() {
        let entry = MemoryEntry {
            id: "0123456789abcdef".to_string(),
            created_at: Utc::now(),
            entry_type: EntryType::Task,
            input: "open\ncalculator".to_string(),
            output: "x".repeat(100),
            metadata: MemoryMetadata::default(),
        };
        let line = format_entry(&entry);
        assert!(line.starts_with("01234567  "));
        assert!(line.contains("[task]  open calculator -> "));
        assert!(line.ends_with("..."));
    }

    #[test]
    fn health_labels() {
        assert_eq!(health_label(&HealthStatus::Healthy), "healthy");
        assert_eq!(
            health_label(&HealthStatus::Unhealthy("timeout".into())),
            "unhealthy (timeout)"
        );
    }

    #[tokio::test]
    async fn clear_requires_confirmation() {
        let store = MemoryStore::open_in_memory().await.unwrap();
        store
            .append(EntryType::Task, "a", "b", MemoryMetadata::default())
            .await
            .unwrap();

        let err = run_memory_clear(&store, false).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.len().await.unwrap(), 1);

        run_memory_clear(&store, true).await.unwrap();
        assert!(store.is_empty().await.unwrap());
    }
}
