// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait for hosted language-model endpoints.

use async_trait::async_trait;

use crate::error::SwitchyardError;
use crate::types::{ChatMessage, HealthStatus};

/// A callable language-model backend.
///
/// One backend instance serves every registered model whose `provider` tag
/// matches [`ModelBackend::provider`]. The core only depends on the returned
/// text and on whether the call succeeded.
#[async_trait]
pub trait ModelBackend: Send + Sync + 'static {
    /// Provider tag this backend serves.
    fn provider(&self) -> &str;

    /// Sends `messages` to `model` and returns the response text.
    async fn invoke(&self, model: &str, messages: &[ChatMessage]) -> Result<String, SwitchyardError>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError> {
        Ok(HealthStatus::Healthy)
    }
}
