// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction and safe truncation for log output and error messages.
//!
//! Two complementary mechanisms:
//! 1. **Regex-based**: catches known secret formats (API keys, Bearer tokens).
//! 2. **Exact-match**: catches the configured upstream credential.

use std::sync::LazyLock;

use regex::Regex;

/// Known secret patterns to redact from output.
static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // OpenAI-compatible secret keys: sk-...
        Regex::new(r"sk-[a-zA-Z0-9_\-]{20,}").unwrap(),
        // Bearer tokens in headers
        Regex::new(r"Bearer\s+[a-zA-Z0-9._\-]{10,}").unwrap(),
    ]
});

/// The redaction placeholder.
const REDACTED: &str = "[REDACTED]";

/// Marker appended to truncated diagnostic strings.
const ELLIPSIS: &str = "...";

/// Redact secrets from a string using regex patterns and exact-match values.
pub fn redact(input: &str, secrets: &[String]) -> String {
    let mut result = input.to_string();

    for pattern in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, REDACTED).to_string();
    }

    // Longest first to avoid partial matches.
    let mut sorted: Vec<&String> = secrets.iter().collect();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted {
        if !value.is_empty() {
            result = result.replace(value.as_str(), REDACTED);
        }
    }

    result
}

/// Truncate to at most `max_chars` characters, appending `...` when cut.
///
/// Never splits a multi-byte character.
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &input[..byte_idx]),
        None => input.to_string(),
    }
}

/// The first `max_chars` characters of `input`, without any marker.
pub fn excerpt(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &input[..byte_idx],
        None => input,
    }
}
