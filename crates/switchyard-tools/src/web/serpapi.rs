// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SerpAPI Google results.

use async_trait::async_trait;
use serde::Deserialize;
use switchyard_core::{SearchResult, SwitchyardError, WebSearch};
use tracing::debug;

use super::{code_query, dedup_by_url, http_client, read_json, search_failure};

const SOURCE: &str = "serpapi";

#[derive(Debug, Default, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Clone)]
pub struct SerpApiSearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: usize,
}

impl SerpApiSearch {
    pub fn new(endpoint: impl Into<String>, api_key: String, max_results: usize) -> Result<Self, SwitchyardError> {
        Ok(Self {
            client: http_client()?,
            endpoint: endpoint.into(),
            api_key,
            max_results,
        })
    }

    async fn query(&self, collaborator: &str, query: &str) -> Result<Vec<SearchResult>, SwitchyardError> {
        let num = self.max_results.to_string();
        let url = reqwest::Url::parse_with_params(
            &self.endpoint,
            &[
                ("api_key", self.api_key.as_str()),
                ("engine", "google"),
                ("q", query),
                ("num", num.as_str()),
            ],
        )
        .map_err(|e| search_failure(collaborator, format!("invalid search endpoint: {e}"), Some(Box::new(e))))?;

        let response: SerpResponse = read_json(collaborator, self.client.get(url)).await?;
        let hits = response
            .organic_results
            .into_iter()
            .map(|hit| SearchResult {
                title: hit.title,
                url: hit.link,
                snippet: hit.snippet,
                source: SOURCE.to_string(),
            })
            .collect();
        let results = dedup_by_url(hits, self.max_results);
        debug!(source = SOURCE, query, results = results.len(), "search completed");
        Ok(results)
    }
}

#[async_trait]
impl WebSearch for SerpApiSearch {
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
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn sends_engine_and_key_and_maps_organic_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("api_key", "serp-test"))
            .and(query_param("engine", "google"))
            .and(query_param("q", "go generics code"))
            .and(query_param("num", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "search_metadata": {"status": "Success"},
                "organic_results": [
                    {"position": 1, "title": "Generics tutorial", "link": "https://go.dev/doc/tutorial/generics", "snippet": "Learn generics"},
                    {"position": 2, "title": "Same page", "link": "https://go.dev/doc/tutorial/generics"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let search = SerpApiSearch::new(server.uri(), "serp-test".to_string(), 5).unwrap();
        let results = search.search_code("generics", Some("go")).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Generics tutorial");
        assert_eq!(results[0].snippet, "Learn generics");
        assert_eq!(results[0].source, "serpapi");
    }

    #[tokio::test]
    async fn missing_organic_results_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "no results"})))
            .mount(&server)
            .await;

        let search = SerpApiSearch::new(server.uri(), "k".to_string(), 5).unwrap();
        assert!(search.search("zzzz").await.unwrap().is_empty());
    }
}
