// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-model running usage statistics.
//!
//! Each entry lives in its own `DashMap` slot. `record` performs the
//! read-increment-write of the running mean while holding that slot's write
//! guard, so concurrent executions against the same model never lose updates.

use std::collections::HashMap;

use dashmap::DashMap;
use switchyard_core::{SwitchyardError, UsageStats};

#[derive(Debug, Default)]
pub struct UsageTracker {
    stats: DashMap<String, UsageStats>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-initializes stats for `model` unless they already exist.
    pub fn ensure(&self, model: &str) {
        self.stats.entry(model.to_string()).or_default();
    }

    pub fn remove(&self, model: &str) {
        self.stats.remove(model);
    }

    /// Folds one successful execution into `model`'s stats and returns the
    /// updated values.
    pub fn record(
        &self,
        model: &str,
        latency_ms: f64,
        tokens: u64,
        cost: f64,
    ) -> Result<UsageStats, SwitchyardError> {
        let mut entry = self
            .stats
            .get_mut(model)
            .ok_or_else(|| SwitchyardError::ModelNotAvailable {
                model: model.to_string(),
            })?;
        entry.record(latency_ms, tokens, cost);
        Ok(entry.clone())
    }

    pub fn get(&self, model: &str) -> Option<UsageStats> {
        self.stats.get(model).map(|s| s.clone())
    }

    /// Point-in-time copy of every model's stats.
    pub fn snapshot(&self) -> HashMap<String, UsageStats> {
        self.stats
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn total_requests(&self) -> u64 {
        self.stats.iter().map(|e| e.requests).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.stats.iter().map(|e| e.cost).sum()
    }

    pub fn total_tokens(&self) -> u64 {
        self.stats.iter().map(|e| e.tokens).sum()
    }
}
