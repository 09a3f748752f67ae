// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model backend for deterministic testing.
//!
//! `MockBackend` implements `ModelBackend` with scripted responses per model,
//! per-model failure and delay injection, and an invocation log. Clones share
//! state, so a test can keep a handle after passing one to an executor.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use switchyard_core::{ChatMessage, HealthStatus, ModelBackend, SwitchyardError};

/// Response returned when nothing is scripted.
pub const DEFAULT_MOCK_RESPONSE: &str = "mock response";

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug)]
struct MockState {
    per_model: HashMap<String, VecDeque<String>>,
    any_model: VecDeque<String>,
    default_response: String,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Vec<MockCall>,
    healthy: bool,
}

#[derive(Debug, Clone)]
pub struct MockBackend {
    provider: String,
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// A backend for provider tag `mock` that always answers "mock response".
    pub fn new() -> Self {
        Self::for_provider("mock")
    }

    pub fn for_provider(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            state: Arc::new(Mutex::new(MockState {
                per_model: HashMap::new(),
                any_model: VecDeque::new(),
                default_response: DEFAULT_MOCK_RESPONSE.to_string(),
                failing: HashSet::new(),
                delays: HashMap::new(),
                calls: Vec::new(),
                healthy: true,
            })),
        }
    }

    /// Builder form of [`MockBackend::fail_model`].
    pub fn failing_model(self, model: &str) -> Self {
        self.fail_model(model);
        self
    }

    /// Builder form of [`MockBackend::delay_model`].
    pub fn delayed_model(self, model: &str, delay: Duration) -> Self {
        self.delay_model(model, delay);
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a response for one model. Consumed before the shared queue.
    pub fn add_response(&self, model: &str, text: &str) {
        self.state()
            .per_model
            .entry(model.to_string())
            .or_default()
            .push_back(text.to_string());
    }

    /// Queue a response for whichever model is invoked next.
    pub fn push_response(&self, text: &str) {
        self.state().any_model.push_back(text.to_string());
    }

    pub fn set_default_response(&self, text: &str) {
        self.state().default_response = text.to_string();
    }

    /// Every later invocation of `model` fails.
    pub fn fail_model(&self, model: &str) {
        self.state().failing.insert(model.to_string());
    }

    pub fn recover_model(&self, model: &str) {
        self.state().failing.remove(model);
    }

    /// Every later invocation of `model` sleeps for `delay` before answering.
    pub fn delay_model(&self, model: &str, delay: Duration) {
        self.state().delays.insert(model.to_string(), delay);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state().healthy = healthy;
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    pub fn calls_for(&self, model: &str) -> usize {
        self.state().calls.iter().filter(|c| c.model == model).count()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn invoke(&self, model: &str, messages: &[ChatMessage]) -> Result<String, SwitchyardError> {
        let (outcome, delay) = {
            let mut state = self.state();
            state.calls.push(MockCall {
                model: model.to_string(),
                messages: messages.to_vec(),
            });
            let delay = state.delays.get(model).copied();
            let outcome = if state.failing.contains(model) {
                Err(SwitchyardError::backend(model, "injected failure"))
            } else {
                let scripted = state
                    .per_model
                    .get_mut(model)
                    .and_then(VecDeque::pop_front);
                Ok(scripted
                    .or_else(|| state.any_model.pop_front())
                    .unwrap_or_else(|| state.default_response.clone()))
            };
            (outcome, delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError> {
        if self.state().healthy {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("marked unhealthy".to_string()))
        }
    }
}
