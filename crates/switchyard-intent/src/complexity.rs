// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic task complexity estimation.
//!
//! Scores length, greeting and small-talk patterns, complexity indicators,
//! code fences, and sentence count. No backend call.

use switchyard_core::Complexity;

/// Greeting/farewell patterns (exact match, case-insensitive).
const SIMPLE_EXACT: &[&str] = &[
    "hi", "hello", "hey", "thanks", "thank you", "bye", "ok", "okay", "yes", "no", "sure",
    "cool", "nice", "yep", "nope",
];

/// Small-talk patterns (contains, case-insensitive).
const SIMPLE_QUESTIONS: &[&str] = &[
    "what time", "what day", "what date", "how are you", "what's up", "who are you",
];

/// Complexity indicators (contains, case-insensitive).
const COMPLEX_INDICATORS: &[&str] = &[
    "analyze", "compare", "evaluate", "implement", "design", "architecture", "trade-off",
    "pros and cons", "step by step", "explain in detail", "debug", "refactor", "optimize",
    "algorithm", "strategy", "in depth", "comprehensive",
];

/// Maps a message to the complexity used in its [`switchyard_core::TaskContext`].
pub fn estimate_complexity(message: &str) -> Complexity {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Complexity::Simple;
    }
    let lower = trimmed.to_lowercase();

    let mut score: i32 = match trimmed.split_whitespace().count() {
        0..=3 => -2,
        4..=15 => 0,
        16..=50 => 1,
        _ => 2,
    };

    if SIMPLE_EXACT.iter().any(|p| lower == *p) {
        score -= 3;
    }
    if SIMPLE_QUESTIONS.iter().any(|q| lower.contains(q)) {
        score -= 2;
    }
    if COMPLEX_INDICATORS.iter().any(|c| lower.contains(c)) {
        score += 2;
    }
    if trimmed.contains("```") {
        score += 3;
    }
    if trimmed.chars().filter(|c| matches!(c, '.' | '?' | '!')).count() >= 3 {
        score += 1;
    }

    match score {
        s if s <= -2 => Complexity::Simple,
        s if s >= 2 => Complexity::Complex,
        _ => Complexity::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_are_simple() {
        assert_eq!(estimate_complexity("hello"), Complexity::Simple);
        assert_eq!(estimate_complexity("how are you"), Complexity::Simple);
    }

    #[test]
    fn plain_questions_are_medium() {
        assert_eq!(
            estimate_complexity("Can you tell me about the history of Rome"),
            Complexity::Medium
        );
    }

    #[test]
    fn analysis_requests_are_complex() {
        assert_eq!(
            estimate_complexity("Compare these two sorting algorithms and explain the trade-offs"),
            Complexity::Complex
        );
        assert_eq!(
            estimate_complexity("fix this:\n```rust\nfn main() {}\n```"),
            Complexity::Complex
        );
    }

    #[test]
    fn empty_is_simple() {
        assert_eq!(estimate_complexity("   "), Complexity::Simple);
    }
}
