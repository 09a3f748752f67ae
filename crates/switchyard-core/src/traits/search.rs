// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web search collaborator.

use async_trait::async_trait;

use crate::error::SwitchyardError;
use crate::types::SearchResult;

#[async_trait]
pub trait WebSearch: Send + Sync + 'static {
    /// General web search. Results are ordered by relevance.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SwitchyardError>;

    /// Search restricted to code-hosting and documentation sources.
    async fn search_code(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Result<Vec<SearchResult>, SwitchyardError>;
}
