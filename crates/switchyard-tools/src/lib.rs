// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concrete collaborators behind the core's tool traits.

pub mod commands;
pub mod files;
pub mod scanner;
pub mod shell;
pub mod web;

pub use commands::{CommandCatalog, Platform};
pub use files::LocalFileOps;
pub use scanner::LocalProjectScanner;
pub use shell::ShellRunner;
pub use web::{DuckDuckGoSearch, MultiSearch, SerpApiSearch, TavilySearch};

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub(crate) fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
