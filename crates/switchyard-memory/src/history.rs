// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation history for one orchestrator instance.

use chrono::{DateTime, Utc};
use serde::Serialize;
use switchyard_core::ChatRole;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only turn list. Writers serialize on the lock; readers may observe
/// a history that is still growing.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    turns: RwLock<Vec<ConversationTurn>>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, role: ChatRole, content: impl Into<String>) -> ConversationTurn {
        let turn = ConversationTurn {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        };
        self.turns.write().await.push(turn.clone());
        turn
    }

    /// The last `n` turns in chronological order.
    pub async fn recent(&self, n: usize) -> Vec<ConversationTurn> {
        let turns = self.turns.read().await;
        turns[turns.len().saturating_sub(n)..].to_vec()
    }

    pub async fn all(&self) -> Vec<ConversationTurn> {
        self.turns.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recent_returns_tail_in_order() {
        let history = ConversationHistory::new();
        for i in 0..5 {
            history.push(ChatRole::User, format!("q{i}")).await;
            history.push(ChatRole::Assistant, format!("a{i}")).await;
        }
        assert_eq!(history.len().await, 10);

        let tail = history.recent(3).await;
        let contents: Vec<_> = tail.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["a3", "q4", "a4"]);
        assert_eq!(history.recent(50).await.len(), 10);
        assert!(history.recent(0).await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_pushes_are_all_kept() {
        let history = std::sync::Arc::new(ConversationHistory::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let history = history.clone();
            handles.push(tokio::spawn(async move {
                history.push(ChatRole::User, format!("m{i}")).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(history.len().await, 16);
    }
}
