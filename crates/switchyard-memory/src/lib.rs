// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction memory for Switchyard.
//!
//! [`MemoryStore`] is an append-only SQLite log of [`MemoryEntry`] records,
//! queryable by recency and case-insensitive substring. [`ConversationHistory`]
//! is the per-orchestrator in-memory turn list.

pub mod history;
mod migrations;
pub mod store;
pub mod types;

pub use history::{ConversationHistory, ConversationTurn};
pub use store::MemoryStore;
pub use types::{EntryType, MemoryEntry, MemoryMetadata};
