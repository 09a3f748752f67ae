// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web search across every configured provider.
//!
//! DuckDuckGo needs no key and is always present. Tavily and SerpAPI join when
//! an API key is configured or found in the environment. [`MultiSearch`] asks
//! each provider in turn, keeps the results of those that answer, and
//! de-duplicates by URL across providers before truncating.

mod duckduckgo;
mod serpapi;
mod tavily;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use switchyard_config::model::ToolsConfig;
use switchyard_core::error::BoxError;
use switchyard_core::{SearchResult, SwitchyardError, WebSearch};
use tracing::{debug, warn};

pub use duckduckgo::DuckDuckGoSearch;
pub use serpapi::SerpApiSearch;
pub use tavily::TavilySearch;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const TAVILY_API_KEY_ENV: &str = "TAVILY_API_KEY";
pub const SERPAPI_API_KEY_ENV: &str = "SERPAPI_API_KEY";

/// Fans one query out to several providers and merges the answers.
pub struct MultiSearch {
    providers: Vec<(&'static str, Arc<dyn WebSearch>)>,
    max_results: usize,
}

impl MultiSearch {
    pub fn new(max_results: usize) -> Self {
        Self {
            providers: Vec::new(),
            max_results,
        }
    }

    /// Adds a provider. Providers are asked in the order they were added.
    pub fn with_provider(mut self, name: &'static str, provider: Arc<dyn WebSearch>) -> Self {
        self.providers.push((name, provider));
        self
    }

    /// DuckDuckGo plus every keyed provider found in `config` or the environment.
    pub fn from_config(config: &ToolsConfig) -> Result<Self, SwitchyardError> {
        let max = config.max_search_results;
        let mut search =
            Self::new(max).with_provider("duckduckgo", Arc::new(DuckDuckGoSearch::from_config(config)?));

        if let Some(key) = configured_key(config.tavily_api_key.as_deref(), TAVILY_API_KEY_ENV) {
            let tavily = TavilySearch::new(config.tavily_endpoint.clone(), key, max)?;
            search = search.with_provider("tavily", Arc::new(tavily));
        }
        if let Some(key) = configured_key(config.serpapi_api_key.as_deref(), SERPAPI_API_KEY_ENV) {
            let serpapi = SerpApiSearch::new(config.serpapi_endpoint.clone(), key, max)?;
            search = search.with_provider("serpapi", Arc::new(serpapi));
        }

        debug!(providers = ?search.sources(), "web search providers ready");
        Ok(search)
    }

    /// Provider names in query order.
    pub fn sources(&self) -> Vec<&'static str> {
        self.providers.iter().map(|(name, _)| *name).collect()
    }

    /// Fails only when every provider failed.
    async fn gather(&self, query: &str, code: Option<Option<&str>>) -> Result<Vec<SearchResult>, SwitchyardError> {
        let mut merged = Vec::new();
        let mut answered = 0;
        let mut last_err = None;

        for (name, provider) in &self.providers {
            let outcome = match code {
                Some(language) => provider.search_code(query, language).await,
                None => provider.search(query).await,
            };
            match outcome {
                Ok(results) => {
                    answered += 1;
                    merged.extend(results);
                }
                Err(e) => {
                    warn!(provider = *name, error = %e, "search provider failed");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) if answered == 0 => Err(e),
            _ => Ok(dedup_by_url(merged, self.max_results)),
        }
    }
}

#[async_trait]
impl WebSearch for MultiSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SwitchyardError> {
        self.gather(query, None).await
    }

    async fn search_code(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Result<Vec<SearchResult>, SwitchyardError> {
        self.gather(query, Some(language)).await
    }
}

/// The configured key, else the environment variable. Blank keys count as absent.
fn configured_key(configured: Option<&str>, env: &str) -> Option<String> {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var(env).ok())
        .filter(|key| !key.trim().is_empty())
}

/// First occurrence of each URL wins. Results without a URL are dropped.
pub(crate) fn dedup_by_url(results: Vec<SearchResult>, max_results: usize) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| !r.url.is_empty() && seen.insert(r.url.clone()))
        .take(max_results)
        .collect()
}

/// Query text for a code search on providers without a code vertical.
pub(crate) fn code_query(query: &str, language: Option<&str>) -> String {
    match language {
        Some(language) => format!("{language} {query} code"),
        None => format!("{query} code"),
    }
}

pub(crate) fn search_failure(
    collaborator: &str,
    message: String,
    source: Option<BoxError>,
) -> SwitchyardError {
    SwitchyardError::Collaborator {
        collaborator: collaborator.to_string(),
        message,
        source,
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client, SwitchyardError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| search_failure("web search", format!("failed to build HTTP client: {e}"), Some(Box::new(e))))
}

/// Sends `request` and decodes a successful JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    collaborator: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, SwitchyardError> {
    let response = request
        .send()
        .await
        .map_err(|e| search_failure(collaborator, format!("HTTP request failed: {e}"), Some(Box::new(e))))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(search_failure(collaborator, format!("search API returned {status}: {body}"), None));
    }

    let body = response
        .text()
        .await
        .map_err(|e| search_failure(collaborator, format!("failed to read response body: {e}"), Some(Box::new(e))))?;
    serde_json::from_str(&body)
        .map_err(|e| search_failure(collaborator, format!("failed to parse search response: {e}"), Some(Box::new(e))))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn hit(url: &str, source: &str) -> SearchResult {
        SearchResult {
            title: url.to_string(),
            url: url.to_string(),
            snippet: String::new(),
            source: source.to_string(),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_and_truncates() {
        let results = vec![
            hit("https://a.example", "duckduckgo"),
            hit("https://b.example", "duckduckgo"),
            hit("https://a.example", "tavily"),
            hit("", "tavily"),
            hit("https://c.example", "serpapi"),
        ];
        let kept = dedup_by_url(results.clone(), 10);
        let pairs: Vec<_> = kept.iter().map(|r| (r.url.as_str(), r.source.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("https://a.example", "duckduckgo"),
                ("https://b.example", "duckduckgo"),
                ("https://c.example", "serpapi"),
            ]
        );
        assert_eq!(dedup_by_url(results, 2).len(), 2);
    }

    #[test]
    fn configured_keys_win_and_blank_keys_are_absent() {
        assert_eq!(
            configured_key(Some("tvly-123"), "SWITCHYARD_UNSET_TEST_KEY").as_deref(),
            Some("tvly-123")
        );
        assert_eq!(configured_key(Some("  "), "SWITCHYARD_UNSET_TEST_KEY"), None);
        assert_eq!(configured_key(None, "SWITCHYARD_UNSET_TEST_KEY"), None);
    }

    #[test]
    fn keyed_providers_join_in_order() {
        let config = ToolsConfig {
            tavily_api_key: Some("tvly-123".to_string()),
            serpapi_api_key: Some("serp-456".to_string()),
            ..ToolsConfig::default()
        };
        let search = MultiSearch::from_config(&config).unwrap();
        assert_eq!(search.sources(), vec!["duckduckgo", "tavily", "serpapi"]);
    }

    async fn ddg_server(url: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Results": [{"Text": "Shared - page", "FirstURL": url}]
            })))
            .mount(&server)
            .await;
        server
    }

    async fn tavily_server(urls: &[&str]) -> MockServer {
        let results: Vec<_> = urls
            .iter()
            .map(|url| serde_json::json!({"title": "T", "url": url, "content": "from tavily"}))
            .collect();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": results })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn merges_providers_and_drops_repeated_urls() {
        let ddg = ddg_server("https://shared.example").await;
        let tavily = tavily_server(&["https://shared.example", "https://only-tavily.example"]).await;

        let search = MultiSearch::new(10)
            .with_provider("duckduckgo", Arc::new(DuckDuckGoSearch::new(ddg.uri(), 10).unwrap()))
            .with_provider(
                "tavily",
                Arc::new(TavilySearch::new(format!("{}/search", tavily.uri()), "k".to_string(), 10).unwrap()),
            );

        let results = search.search("shared").await.unwrap();
        let pairs: Vec<_> = results.iter().map(|r| (r.url.as_str(), r.source.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("https://shared.example", "duckduckgo"),
                ("https://only-tavily.example", "tavily"),
            ]
        );
    }

    #[tokio::test]
    async fn one_failing_provider_does_not_fail_the_search() {
        let down = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&down)
            .await;
        let tavily = tavily_server(&["https://only-tavily.example"]).await;

        let search = MultiSearch::new(5)
            .with_provider("duckduckgo", Arc::new(DuckDuckGoSearch::new(down.uri(), 5).unwrap()))
            .with_provider(
                "tavily",
                Arc::new(TavilySearch::new(format!("{}/search", tavily.uri()), "k".to_string(), 5).unwrap()),
            );

        let results = search.search_code("parse json", Some("rust")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, "tavily");
    }

    #[tokio::test]
    async fn every_provider_failing_is_an_error() {
        let down = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&down)
            .await;

        let search = MultiSearch::new(5)
            .with_provider("duckduckgo", Arc::new(DuckDuckGoSearch::new(down.uri(), 5).unwrap()));
        let err = search.search("anything").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn no_providers_means_no_results() {
        assert!(MultiSearch::new(5).search("anything").await.unwrap().is_empty());
    }
}
