// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat completions.
//!
//! Transient errors (429, 500, 503) are retried once after a short delay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use switchyard_config::model::BackendConfig;
use switchyard_core::{ChatMessage, HealthStatus, ModelBackend, SwitchyardError};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

const DEFAULT_PROVIDER: &str = "openai";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    provider: String,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl OpenAiBackend {
    /// Builds a client. A `None` key sends no `Authorization` header.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self, SwitchyardError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}"))
                    .map_err(|e| SwitchyardError::Config(format!("invalid API key header value: {e}")))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| SwitchyardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            provider: DEFAULT_PROVIDER.to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Builds from `[backend]`, reading the key from `OPENAI_API_KEY` when unset.
    pub fn from_config(config: &BackendConfig) -> Result<Self, SwitchyardError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.is_empty());
        Self::new(
            config.base_url.clone(),
            api_key.as_deref(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Serves models whose descriptor carries `provider` instead of `openai`.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, SwitchyardError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest { model, messages };
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(model, attempt, "retrying completion request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| SwitchyardError::BackendExecutionFailed {
                    model: model.to_string(),
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(model, status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| SwitchyardError::BackendExecutionFailed {
                    model: model.to_string(),
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let parsed: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| SwitchyardError::BackendExecutionFailed {
                        model: model.to_string(),
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or_else(|| SwitchyardError::backend(model, "response contained no message content"));
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(model, status = %status, "transient error, will retry");
                last_error = Some(SwitchyardError::backend(model, format!("API returned {status}: {body}")));
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(SwitchyardError::backend(model, message));
        }

        Err(last_error.unwrap_or_else(|| SwitchyardError::backend(model, "completion request failed after retries")))
    }
}

/// Status codes worth one retry.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn invoke(&self, model: &str, messages: &[ChatMessage]) -> Result<String, SwitchyardError> {
        self.complete(model, messages).await
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError> {
        let response = match self.client.get(format!("{}/models", self.base_url)).send().await {
            Ok(response) => response,
            Err(e) => return Ok(HealthStatus::Unhealthy(format!("unreachable: {e}"))),
        };
        let status = response.status();
        Ok(if status.is_success() {
            HealthStatus::Healthy
        } else if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            HealthStatus::Unhealthy(format!("authentication rejected ({status})"))
        } else {
            HealthStatus::Degraded(format!("models endpoint returned {status}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> OpenAiBackend {
        OpenAiBackend::new(server.uri(), Some("sk-test"), Duration::from_secs(5))
            .unwrap()
            .with_retry_delay(Duration::from_millis(10))
    }

    fn completion(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]
        })
    }

    #[tokio::test]
    async fn invoke_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("hello!")))
            .expect(1)
            .mount(&server)
            .await;

        let text = backend(&server)
            .invoke("gpt-4o-mini", &[ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_eq!(text, "hello!");
    }

    #[tokio::test]
    async fn retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("after retry")))
            .mount(&server)
            .await;

        let text = backend(&server).invoke("m", &[ChatMessage::user("x")]).await.unwrap();
        assert_eq!(text, "after retry");
    }

    #[tokio::test]
    async fn gives_up_after_second_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"message": "overloaded", "type": "server_error"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let err = backend(&server).invoke("m", &[ChatMessage::user("x")]).await.unwrap_err();
        assert!(matches!(err, SwitchyardError::BackendExecutionFailed { .. }));
        assert!(err.to_string().contains("server_error"), "got: {err}");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "unknown model", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = backend(&server).invoke("nope", &[ChatMessage::user("x")]).await.unwrap_err();
        assert!(err.to_string().contains("unknown model"));
    }

    #[tokio::test]
    async fn empty_choices_is_a_backend_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let err = backend(&server).invoke("m", &[ChatMessage::user("x")]).await.unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }

    #[tokio::test]
    async fn health_check_maps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let status = backend(&server).health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Unhealthy(_)));
    }

    #[test]
    fn provider_tag_is_configurable() {
        let backend = OpenAiBackend::new("http://localhost:1", None, Duration::from_secs(1))
            .unwrap()
            .with_provider("local");
        assert_eq!(backend.provider(), "local");
    }
}
