// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts with placeholder substitution.

use tutorgate_config::model::ReplyConfig;
use tutorgate_security::excerpt;

/// Number of leading message characters echoed in the timeout reply.
pub const EXCERPT_CHARS: usize = 30;

/// Rendered replies for every non-success path.
#[derive(Debug, Clone)]
pub struct ReplyTemplates {
    config: ReplyConfig,
}

impl ReplyTemplates {
    pub fn new(config: ReplyConfig) -> Self {
        Self { config }
    }

    /// Reply for an empty or whitespace-only message.
    pub fn empty_message(&self) -> String {
        self.config.empty_message.clone()
    }

    /// Reply for a missing or malformed JSON body.
    pub fn invalid_body(&self) -> String {
        self.config.invalid_body.clone()
    }

    /// Reply for a non-200 upstream status.
    pub fn upstream_failure(&self, status: u16) -> String {
        let status = status.to_string();
        fill(&self.config.upstream_failure, &[("status", status.as_str())])
    }

    /// Reply for a missed deadline, echoing the first characters of `message`.
    pub fn timeout(&self, message: &str, timeout_secs: u64) -> String {
        let timeout = timeout_secs.to_string();
        fill(
            &self.config.timeout,
            &[
                ("excerpt", excerpt(message, EXCERPT_CHARS)),
                ("timeout", timeout.as_str()),
            ],
        )
    }

    /// Reply for any other failure.
    pub fn internal_error(&self) -> String {
        self.config.internal_error.clone()
    }
}

/// Substitute `{name}` placeholders in one pass over the template.
///
/// Inserted values are never rescanned, so user text that looks like a
/// placeholder is echoed verbatim. Unknown placeholders are kept as written.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

impl Default for ReplyTemplates {
    fn default() -> Self {
        Self::new(ReplyConfig::default())
    }
}
