// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token estimation.

use switchyard_core::ChatMessage;

/// Characters per token assumed by [`estimate_tokens`].
pub const CHARS_PER_TOKEN: usize = 4;

/// Coarse token estimate: `ceil((input chars + response chars) / 4)`.
///
/// This is an approximation, not a tokenizer. Cost figures are defined in
/// terms of it, so it must stay stable. Characters are Unicode scalar values.
pub fn estimate_tokens(messages: &[ChatMessage], response: &str) -> u64 {
    let chars: usize = messages
        .iter()
        .map(|m| m.content.chars().count())
        .sum::<usize>()
        + response.chars().count();
    chars.div_ceil(CHARS_PER_TOKEN) as u64
}
