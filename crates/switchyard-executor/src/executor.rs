// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`TaskExecutor`]: model resolution, bounded invocation, usage accounting,
//! and single-step fallback.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use switchyard_config::model::ExecutorConfig;
use switchyard_core::{
    ChatMessage, ExecutionResult, HealthStatus, ModelBackend, SwitchyardError, TaskContext,
};
use switchyard_router::{ModelRegistry, ModelSelector};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::tokens::estimate_tokens;

/// Executes tasks against the backend registered for each model's provider.
pub struct TaskExecutor {
    registry: Arc<ModelRegistry>,
    selector: ModelSelector,
    /// Backends keyed by provider tag.
    backends: HashMap<String, Arc<dyn ModelBackend>>,
    fallback_model: Option<String>,
    timeout: Duration,
}

impl TaskExecutor {
    pub fn new(registry: Arc<ModelRegistry>, selector: ModelSelector, config: &ExecutorConfig) -> Self {
        Self {
            registry,
            selector,
            backends: HashMap::new(),
            fallback_model: config.fallback_model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Registers `backend` for its provider tag, replacing any previous one.
    pub fn with_backend(mut self, backend: Arc<dyn ModelBackend>) -> Self {
        self.backends.insert(backend.provider().to_string(), backend);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn fallback_model(&self) -> Option<&str> {
        self.fallback_model.as_deref()
    }

    /// Scores the current registry snapshot for `context`.
    pub fn select_model(&self, context: &TaskContext) -> Result<String, SwitchyardError> {
        let snapshot = self.registry.snapshot();
        self.selector
            .select_optimal_model(context, &snapshot.models, &snapshot.usage)
            .ok_or_else(|| SwitchyardError::ModelNotAvailable {
                model: format!("<any model for {} task>", context.task_type),
            })
    }

    /// Runs `messages` on `forced_model`, or on the selector's choice for `context`.
    ///
    /// A failed attempt is retried once on the fallback model unless the failed
    /// model already is the fallback. At most two backend invocations happen
    /// per call. Usage is recorded only for the attempt that succeeds.
    pub async fn execute_task(
        &self,
        messages: &[ChatMessage],
        context: &TaskContext,
        forced_model: Option<&str>,
    ) -> Result<ExecutionResult, SwitchyardError> {
        let primary = match forced_model {
            Some(model) => model.to_string(),
            None => self.select_model(context)?,
        };

        let primary_err = match self.attempt(&primary, messages).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        let Some(fallback) = self.fallback_model.as_deref().filter(|f| *f != primary) else {
            warn!(model = primary.as_str(), error = %primary_err, "task failed with no fallback available");
            return Err(match primary_err {
                e @ SwitchyardError::ModelNotAvailable { .. } => e,
                other => into_backend_failure(&primary, other),
            });
        };

        warn!(
            model = primary.as_str(),
            fallback,
            error = %primary_err,
            "backend failed, retrying on fallback model"
        );

        self.attempt(fallback, messages).await.map_err(|fallback_err| {
            warn!(fallback, error = %fallback_err, "fallback model also failed");
            SwitchyardError::BackendExecutionFailed {
                model: primary.clone(),
                message: format!("{primary_err}; fallback `{fallback}` failed: {fallback_err}"),
                source: Some(Box::new(primary_err)),
            }
        })
    }

    /// One invocation of one model. Records usage on success only.
    async fn attempt(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ExecutionResult, SwitchyardError> {
        let descriptor = self.registry.get(model)?;
        let backend = self.backends.get(&descriptor.provider).ok_or_else(|| {
            SwitchyardError::ModelNotAvailable {
                model: model.to_string(),
            }
        })?;

        let started = Instant::now();
        let response = match tokio::time::timeout(self.timeout, backend.invoke(model, messages)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(into_backend_failure(model, e)),
            Err(_) => {
                return Err(SwitchyardError::BackendExecutionFailed {
                    model: model.to_string(),
                    message: format!("no response within {:?}", self.timeout),
                    source: Some(Box::new(SwitchyardError::Timeout {
                        duration: self.timeout,
                    })),
                });
            }
        };
        let elapsed = started.elapsed();

        let tokens = estimate_tokens(messages, &response);
        let cost = tokens as f64 * descriptor.cost_per_token;
        let latency_ms = elapsed.as_secs_f64() * 1000.0;
        self.registry.usage().record(model, latency_ms, tokens, cost)?;

        info!(
            model,
            latency_ms = elapsed.as_millis() as u64,
            tokens,
            cost,
            "task executed"
        );

        Ok(ExecutionResult {
            response,
            model: model.to_string(),
            execution_time_ms: elapsed.as_millis() as u64,
            tokens,
            cost,
        })
    }

    /// Health of every registered backend, sorted by provider tag.
    pub async fn backend_health(&self) -> Vec<(String, HealthStatus)> {
        let mut providers: Vec<_> = self.backends.iter().collect();
        providers.sort_by(|a, b| a.0.cmp(b.0));

        let mut report = Vec::with_capacity(providers.len());
        for (provider, backend) in providers {
            let status = backend
                .health_check()
                .await
                .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
            report.push((provider.clone(), status));
        }
        report
    }
}

fn into_backend_failure(model: &str, err: SwitchyardError) -> SwitchyardError {
    match err {
        e @ SwitchyardError::BackendExecutionFailed { .. } => e,
        other => SwitchyardError::BackendExecutionFailed {
            model: model.to_string(),
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}
