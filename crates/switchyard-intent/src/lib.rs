// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification for incoming messages.
//!
//! [`IntentClassifier`] asks a backend model for a structured intent record
//! and falls back to the priority-ordered [`KeywordClassifier`] whenever the
//! model output cannot be parsed or the call fails. The [`phrases`] module
//! extracts command keys, file requests, recall queries, and paths that the
//! orchestrator's handlers act on.

pub mod classifier;
pub mod complexity;
pub mod keywords;
pub mod parse;
pub mod phrases;

pub use classifier::IntentClassifier;
pub use complexity::estimate_complexity;
pub use keywords::KeywordClassifier;
pub use parse::{parse_intent_output, ParsedIntent};
