// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DuckDuckGo Instant Answer API.
//!
//! The abstract (when present) comes first, then direct results, then related
//! topics with nested topic groups flattened. Results are de-duplicated by URL,
//! keeping the first occurrence, and truncated to `max_results`.

use async_trait::async_trait;
use serde::Deserialize;
use switchyard_config::model::ToolsConfig;
use switchyard_core::{SearchResult, SwitchyardError, WebSearch};
use tracing::debug;

use super::{code_query, dedup_by_url, http_client, read_json, search_failure};

const SOURCE: &str = "duckduckgo";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default)]
    results: Vec<Topic>,
    #[serde(default)]
    related_topics: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Topic {
    #[serde(default)]
    text: String,
    #[serde(default, rename = "FirstURL")]
    first_url: String,
    /// Present on topic groups instead of `Text`/`FirstURL`.
    #[serde(default)]
    topics: Vec<Topic>,
}

#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: impl Into<String>, max_results: usize) -> Result<Self, SwitchyardError> {
        Ok(Self {
            client: http_client()?,
            endpoint: endpoint.into(),
            max_results,
        })
    }

    pub fn from_config(config: &ToolsConfig) -> Result<Self, SwitchyardError> {
        Self::new(config.search_endpoint.clone(), config.max_search_results)
    }

    async fn query(&self, collaborator: &str, query: &str) -> Result<Vec<SearchResult>, SwitchyardError> {
        let url = reqwest::Url::parse_with_params(
            &self.endpoint,
            &[("q", query), ("format", "json"), ("no_html", "1"), ("skip_disambig", "1")],
        )
        .map_err(|e| search_failure(collaborator, format!("invalid search endpoint: {e}"), Some(Box::new(e))))?;

        let answer: InstantAnswer = read_json(collaborator, self.client.get(url)).await?;
        let results = collect_results(answer, self.max_results);
        debug!(source = SOURCE, query, results = results.len(), "search completed");
        Ok(results)
    }
}

fn collect_results(answer: InstantAnswer, max_results: usize) -> Vec<SearchResult> {
    let mut candidates = Vec::new();
    if !answer.abstract_url.is_empty() {
        candidates.push(SearchResult {
            title: if answer.heading.is_empty() {
                answer.abstract_url.clone()
            } else {
                answer.heading.clone()
            },
            url: answer.abstract_url.clone(),
            snippet: answer.abstract_text.clone(),
            source: SOURCE.to_string(),
        });
    }
    flatten(&answer.results, &mut candidates);
    flatten(&answer.related_topics, &mut candidates);

    dedup_by_url(candidates, max_results)
}

fn flatten(topics: &[Topic], out: &mut Vec<SearchResult>) {
    for topic in topics {
        if !topic.topics.is_empty() {
            flatten(&topic.topics, out);
        } else if !topic.first_url.is_empty() {
            out.push(SearchResult {
                title: topic_title(&topic.text),
                url: topic.first_url.clone(),
                snippet: topic.text.clone(),
                source: SOURCE.to_string(),
            });
        }
    }
}

/// Topic text reads "Title - description"; the title is the part before the dash.
fn topic_title(text: &str) -> String {
    text.split_once(" - ")
        .map(|(title, _)| title)
        .unwrap_or(text)
        .trim()
        .to_string()
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
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
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn body() -> serde_json::Value {
        serde_json::json!({
            "Heading": "Rust (programming language)",
            "AbstractText": "Rust is a systems language.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "Results": [
                {"Text": "Official site - rust-lang.org", "FirstURL": "https://www.rust-lang.org"}
            ],
            "RelatedTopics": [
                {"Text": "Cargo - Rust package manager", "FirstURL": "https://doc.rust-lang.org/cargo"},
                {"Name": "See also", "Topics": [
                    {"Text": "Rustup - toolchain installer", "FirstURL": "https://rustup.rs"},
                    {"Text": "Duplicate", "FirstURL": "https://www.rust-lang.org"}
                ]}
            ]
        })
    }

    async fn server_with(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn search_orders_dedups_and_flattens() {
        let server = server_with(body()).await;
        let search = DuckDuckGoSearch::new(format!("{}/", server.uri()), 10).unwrap();

        let results = search.search("rust").await.unwrap();
        let urls: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://en.wikipedia.org/wiki/Rust_(programming_language)",
                "https://www.rust-lang.org",
                "https://doc.rust-lang.org/cargo",
                "https://rustup.rs",
            ]
        );
        assert_eq!(results[0].title, "Rust (programming language)");
        assert_eq!(results[1].title, "Official site");
        assert_eq!(results[2].snippet, "Cargo - Rust package manager");
        assert!(results.iter().all(|r| r.source == "duckduckgo"));
    }

    #[tokio::test]
    async fn search_truncates_to_max_results() {
        let server = server_with(body()).await;
        let search = DuckDuckGoSearch::new(server.uri(), 2).unwrap();
        assert_eq!(search.search("rust").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn code_search_scopes_query_by_language() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "rust parse json code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let search = DuckDuckGoSearch::new(server.uri(), 5).unwrap();
        let results = search.search_code("parse json", Some("rust")).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn http_errors_become_collaborator_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let search = DuckDuckGoSearch::new(server.uri(), 5).unwrap();
        let err = search.search("anything").await.unwrap_err();
        assert!(matches!(err, SwitchyardError::Collaborator { ref collaborator, .. } if collaborator == "web search"));
        assert!(err.to_string().contains("503"));
    }
}
