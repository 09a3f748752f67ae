// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tavily search API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use switchyard_core::{SearchResult, SwitchyardError, WebSearch};
use tracing::debug;

use super::{code_query, dedup_by_url, http_client, read_json};

const SOURCE: &str = "tavily";

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'static str,
    include_answer: bool,
    include_images: bool,
    include_raw_content: bool,
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Debug, Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone)]
pub struct TavilySearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: usize,
}

impl TavilySearch {
    pub fn new(endpoint: impl Into<String>, api_key: String, max_results: usize) -> Result<Self, SwitchyardError> {
        Ok(Self {
            client: http_client()?,
            endpoint: endpoint.into(),
            api_key,
            max_results,
        })
    }

    async fn query(&self, collaborator: &str, query: &str) -> Result<Vec<SearchResult>, SwitchyardError> {
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results: self.max_results,
            search_depth: "advanced",
            include_answer: false,
            include_images: false,
            include_raw_content: false,
        };
        let response: TavilyResponse = read_json(collaborator, self.client.post(&self.endpoint).json(&body)).await?;

        let hits = response
            .results
            .into_iter()
            .map(|hit| SearchResult {
                title: if hit.title.is_empty() { hit.url.clone() } else { hit.title },
                url: hit.url,
                snippet: hit.content,
                source: SOURCE.to_string(),
            })
            .collect();
        let results = dedup_by_url(hits, self.max_results);
        debug!(source = SOURCE, query, results = results.len(), "search completed");
        Ok(results)
    }
}

#[async_trait]
impl WebSearch for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SwitchyardError> {
        self.query("web search", query).await
    }

    async fn search_code(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Result<Vec<SearchResult>, SwitchyardError> {
        self.query("code search", &code_query(query, language)).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn posts_key_and_query_and_maps_hits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(serde_json::json!({
                "api_key": "tvly-test",
                "query": "tokio runtime",
                "max_results": 3,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": null,
                "results": [
                    {"title": "Tokio", "url": "https://tokio.rs", "content": "An async runtime", "score": 0.9},
                    {"title": "", "url": "https://docs.rs/tokio", "content": "API docs"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let search = TavilySearch::new(format!("{}/search", server.uri()), "tvly-test".to_string(), 3).unwrap();
        let results = search.search("tokio runtime").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Tokio");
        assert_eq!(results[0].snippet, "An async runtime");
        assert_eq!(results[1].title, "https://docs.rs/tokio");
        assert!(results.iter().all(|r| r.source == "tavily"));
    }

    #[tokio::test]
    async fn rejected_key_is_a_collaborator_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let search = TavilySearch::new(server.uri(), "bad".to_string(), 3).unwrap();
        let err = search.search_code("parse json", None).await.unwrap_err();
        assert!(matches!(err, SwitchyardError::Collaborator { ref collaborator, .. } if collaborator == "code search"));
        assert!(err.to_string().contains("401"));
    }
}
