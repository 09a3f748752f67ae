// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static follow-up suggestions per intent type.

use switchyard_core::IntentType;

/// Follow-up prompts offered after a request of type `intent`.
pub fn suggestions_for(intent: IntentType) -> &'static [&'static str] {
    match intent {
        IntentType::Search => &[
            "Search for more specific information",
            "Look up related code examples",
            "Summarize the top result",
        ],
        IntentType::Coding => &[
            "Explain how this code works",
            "Write tests for this code",
            "Review the code for bugs",
        ],
        IntentType::Automation => &[
            "List files in the current directory",
            "Show system information",
            "Run another command",
        ],
        IntentType::Analysis => &[
            "Analyze the project structure",
            "Compare alternative approaches",
            "Summarize the key findings",
        ],
        IntentType::Conversational => &[
            "Remember what we discussed earlier",
            "Search the web for more details",
            "Help me write some code",
        ],
        IntentType::System => &[
            "Show usage statistics",
            "List available models",
            "List enabled capabilities",
        ],
    }
}
