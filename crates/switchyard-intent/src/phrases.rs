// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phrase extraction shared by the keyword rules and the request handlers.
//!
//! Matching is ASCII case-insensitive. Byte offsets found in the
//! ASCII-lowercased copy are valid in the original message, so extracted
//! paths and commands keep their original casing.

/// Command keys and the phrases that name them. First match wins.
const COMMAND_PHRASES: &[(&str, &[&str])] = &[
    ("open_calculator", &["calculator", "calc"]),
    ("open_browser", &["browser", "web browser"]),
    ("open_text_editor", &["text editor", "notepad", "editor"]),
    ("take_screenshot", &["screenshot", "screen shot", "capture the screen"]),
    ("list_files", &["list files", "list the files", "show files"]),
    ("show_directory", &["show directory", "current directory", "working directory"]),
    ("system_info", &["system info", "system information"]),
];

/// Leading words that start a memory recall, longest first.
const RECALL_TRIGGERS: &[&str] = &["remind me", "remember", "recall"];

/// Filler word stripped once after the recall trigger.
const RECALL_FILLERS: &[&str] = &["what", "about", "of", "that"];

/// Words that mark a coding request as debugging.
const DEBUGGING_WORDS: &[&str] = &["debug", "bug", "error", "fix", "stack trace"];

const RUN_PREFIXES: &[&str] = &["run ", "execute "];

/// Search lead-ins, longest first so "search the web for" beats "search for".
const SEARCH_LEADS: &[&str] = &[
    "search the web for",
    "find information about",
    "find information on",
    "search the web",
    "search for",
    "look up",
    "browse for",
    "google",
];

/// Returns the command catalog key named by `message`, if any.
pub fn recognize_command(message: &str) -> Option<&'static str> {
    let lower = message.to_ascii_lowercase();
    COMMAND_PHRASES
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| contains_phrase(&lower, p)))
        .map(|(key, _)| *key)
}

/// Every key the catalog understands.
pub fn command_keys() -> impl Iterator<Item = &'static str> {
    COMMAND_PHRASES.iter().map(|(key, _)| *key)
}

/// Extracts `<command>` from `run <command>` or `execute <command>`.
pub fn parse_run_command(message: &str) -> Option<String> {
    let trimmed = message.trim();
    let lower = trimmed.to_ascii_lowercase();
    RUN_PREFIXES.iter().find_map(|prefix| {
        lower.starts_with(prefix).then(|| {
            trimmed[prefix.len()..]
                .trim()
                .trim_matches(|c| c == '`' || c == '"')
                .to_string()
        })
    })
    .filter(|cmd| !cmd.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Create,
    Read,
    Delete,
}

impl FileOp {
    pub fn as_str(self) -> &'static str {
        match self {
            FileOp::Create => "create",
            FileOp::Read => "read",
            FileOp::Delete => "delete",
        }
    }
}

/// A parsed `create/read/delete file <path> [with <content>]` phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub op: FileOp,
    pub path: String,
    pub content: Option<String>,
}

/// Parses a file phrase anywhere in `message`.
pub fn parse_file_request(message: &str) -> Option<FileRequest> {
    let lower = message.to_ascii_lowercase();
    let (op, start) = [
        (FileOp::Create, "create file "),
        (FileOp::Read, "read file "),
        (FileOp::Delete, "delete file "),
    ]
    .into_iter()
    .find_map(|(op, phrase)| lower.find(phrase).map(|pos| (op, pos + phrase.len())))?;

    let rest = &message[start..];
    let (path, content) = match op {
        FileOp::Create => match rest.to_ascii_lowercase().find(" with ") {
            Some(pos) => (&rest[..pos], Some(rest[pos + 6..].trim().to_string())),
            None => (rest, None),
        },
        _ => (rest, None),
    };

    let path = clean_token(path.trim());
    if path.is_empty() {
        return None;
    }
    Some(FileRequest {
        op,
        path: path.to_string(),
        content,
    })
}

/// True when `message` is a file phrase.
pub fn is_file_phrase(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["create file", "read file", "delete file"]
        .iter()
        .any(|p| lower.contains(p))
}

/// Normalized recall query, or `None` when `message` is not a recall request.
///
/// `"Remember what we discussed about pricing?"` becomes
/// `"we discussed about pricing"`.
pub fn recall_query(message: &str) -> Option<String> {
    let lower = message.trim().to_lowercase();
    let rest = RECALL_TRIGGERS
        .iter()
        .find_map(|t| strip_word(&lower, t))?;

    let rest = RECALL_FILLERS
        .iter()
        .find_map(|f| strip_word(rest, f))
        .unwrap_or(rest);

    Some(
        rest.trim_end_matches(|c: char| c.is_ascii_punctuation())
            .trim()
            .to_string(),
    )
}

/// True when `message` starts with a recall trigger.
pub fn is_recall(message: &str) -> bool {
    let lower = message.trim().to_lowercase();
    RECALL_TRIGGERS.iter().any(|t| strip_word(&lower, t).is_some())
}

/// True when `message` talks about a bug, an error or a fix.
pub fn mentions_debugging(message: &str) -> bool {
    let lower = message.to_lowercase();
    DEBUGGING_WORDS.iter().any(|w| lower.contains(w))
}

/// The search terms of a search request, with the lead-in phrase removed.
///
/// Falls back to the whole trimmed message when no lead-in is present.
pub fn search_query(message: &str) -> String {
    let trimmed = message.trim();
    let lower = trimmed.to_ascii_lowercase();
    let query = SEARCH_LEADS
        .iter()
        .find_map(|lead| lower.find(lead).map(|pos| &trimmed[pos + lead.len()..]))
        .map(|rest| rest.trim().trim_end_matches(['?', '.', '!']).trim())
        .filter(|rest| !rest.is_empty())
        .unwrap_or(trimmed);
    query.to_string()
}

/// First token that looks like a filesystem path.
pub fn extract_path(message: &str) -> Option<String> {
    message
        .split_whitespace()
        .map(clean_token)
        .find(|token| looks_like_path(token))
        .map(str::to_string)
}

fn looks_like_path(token: &str) -> bool {
    if token.is_empty() || token.contains("://") {
        return false;
    }
    if token == "." || token == ".." {
        return true;
    }
    if token.starts_with('/')
        || token.starts_with("./")
        || token.starts_with("../")
        || token.starts_with("~/")
        || token.contains('/')
        || token.contains('\\')
    {
        return true;
    }
    // bare file name with an extension, e.g. notes.txt
    match token.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && (1..=5).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

fn clean_token(token: &str) -> &str {
    let token = token.trim_matches(|c| matches!(c, '"' | '\'' | '`' | '(' | ')' | ',' | ';' | ':' | '?' | '!'));
    if token.len() > 1 && token != ".." {
        token.strip_suffix('.').unwrap_or(token)
    } else {
        token
    }
}

/// Strips `word` from the start of `text` when followed by a boundary.
fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if !c.is_alphanumeric() => Some(rest.trim_start()),
        Some(_) => None,
    }
}

/// Word-boundary substring match on an already lowercased haystack.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(pos, _)| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
