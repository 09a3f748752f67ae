// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session statistics, computed on demand.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use switchyard_router::UsageTracker;

/// Request outcome counters for one orchestrator instance.
#[derive(Debug, Default)]
pub(crate) struct RequestCounters {
    total: AtomicU64,
    successful: AtomicU64,
}

impl RequestCounters {
    pub(crate) fn record(&self, success: bool) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self, usage: &UsageTracker) -> SessionStats {
        let total_requests = self.total.load(Ordering::Relaxed);
        let successful_requests = self.successful.load(Ordering::Relaxed);
        let success_rate = if total_requests == 0 {
            0.0
        } else {
            successful_requests as f64 / total_requests as f64
        };
        let requests_per_model = usage
            .snapshot()
            .into_iter()
            .map(|(model, stats)| (model, stats.requests))
            .collect();

        SessionStats {
            total_requests,
            successful_requests,
            success_rate,
            total_cost: usage.total_cost(),
            total_tokens: usage.total_tokens(),
            requests_per_model,
        }
    }
}

/// Counters since startup plus usage totals across all models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    /// `successful / total`, or 0 before the first request.
    pub success_rate: f64,
    pub total_cost: f64,
    pub total_tokens: u64,
    pub requests_per_model: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_zero_before_first_request() {
        let counters = RequestCounters::default();
        let stats = counters.snapshot(&UsageTracker::new());
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn counts_successes_and_reads_usage() {
        let usage = UsageTracker::new();
        usage.ensure("m");
        usage.record("m", 100.0, 40, 0.5).unwrap();

        let counters = RequestCounters::default();
        counters.record(true);
        counters.record(false);
        counters.record(true);
        counters.record(true);

        let stats = counters.snapshot(&usage);
        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.successful_requests, 3);
        assert!((stats.success_rate - 0.75).abs() < f64::EPSILON);
        assert_eq!(stats.total_tokens, 40);
        assert_eq!(stats.requests_per_model.get("m"), Some(&1));
    }
}
