// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic request classification.
//!
//! Maps a message to one of the four profile kinds using an ordered rule
//! table. No LLM pre-call, no network, no latency. The first matching rule
//! wins, so rule order is part of the contract.

use tutorgate_config::model::RoutingConfig;
use tutorgate_core::ProfileKind;

/// A condition evaluated against a normalized message.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The lower-cased message contains at least one of these substrings.
    ContainsAny(Vec<String>),
    /// The lower-cased message has more than this many characters.
    LongerThan(usize),
    /// Any of the inner predicates holds.
    AnyOf(Vec<Predicate>),
    /// Always holds.
    Always,
}

impl Predicate {
    /// Keywords are matched case-insensitively, so they are lower-cased here once.
    pub fn contains_any<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Predicate::ContainsAny(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        )
    }

    fn matches(&self, message: &NormalizedMessage) -> bool {
        match self {
            Predicate::ContainsAny(keywords) => {
                keywords.iter().any(|k| message.text.contains(k.as_str()))
            }
            Predicate::LongerThan(limit) => message.char_len > *limit,
            Predicate::AnyOf(inner) => inner.iter().any(|p| p.matches(message)),
            Predicate::Always => true,
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingRule {
    /// Condition for this rule.
    pub predicate: Predicate,
    /// Profile selected when the condition holds.
    pub kind: ProfileKind,
    /// Short reason recorded in logs.
    pub reason: &'static str,
}

/// Result of classifying a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The selected profile kind.
    pub kind: ProfileKind,
    /// Reason from the rule that matched.
    pub reason: &'static str,
    /// Character count of the normalized message.
    pub char_len: usize,
}

struct NormalizedMessage {
    text: String,
    char_len: usize,
}

impl NormalizedMessage {
    fn new(message: &str) -> Self {
        let text = message.to_lowercase();
        let char_len = text.chars().count();
        Self { text, char_len }
    }
}

/// Ordered rule-table classifier.
#[derive(Debug, Clone)]
pub struct RequestClassifier {
    rules: Vec<RoutingRule>,
}

impl RequestClassifier {
    /// Build the standard four-rule table from routing configuration.
    ///
    /// 1. code keyword → coder
    /// 2. longer than the complex threshold, or complexity keyword → powerful
    /// 3. longer than the standard threshold → standard
    /// 4. anything else → fast
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::with_rules(vec![
            RoutingRule {
                predicate: Predicate::contains_any(&config.code_keywords),
                kind: ProfileKind::Coder,
                reason: "code keyword",
            },
            RoutingRule {
                predicate: Predicate::AnyOf(vec![
                    Predicate::LongerThan(config.complex_length_threshold),
                    Predicate::contains_any(&config.complex_keywords),
                ]),
                kind: ProfileKind::Powerful,
                reason: "long message or explanation keyword",
            },
            RoutingRule {
                predicate: Predicate::LongerThan(config.standard_length_threshold),
                kind: ProfileKind::Standard,
                reason: "medium-length message",
            },
            RoutingRule {
                predicate: Predicate::Always,
                kind: ProfileKind::Fast,
                reason: "short message",
            },
        ])
    }

    /// Build a classifier from an explicit rule table.
    pub fn with_rules(rules: Vec<RoutingRule>) -> Self {
        Self { rules }
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Classify a message. Total: a table without a matching rule yields `Fast`.
    pub fn classify(&self, message: &str) -> Classification {
        let normalized = NormalizedMessage::new(message);

        match self.rules.iter().find(|r| r.predicate.matches(&normalized)) {
            Some(rule) => Classification {
                kind: rule.kind,
                reason: rule.reason,
                char_len: normalized.char_len,
            },
            None => Classification {
                kind: ProfileKind::Fast,
                reason: "no rule matched",
                char_len: normalized.char_len,
            },
        }
    }
}

impl Default for RequestClassifier {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}
