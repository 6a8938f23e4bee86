// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-scoped types shared by the classifier, dispatcher, and gateway.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TutorgateError;

/// The four named request profiles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Smallest, fastest model for short questions.
    Fast,
    /// Mid-size model for medium-length questions.
    Standard,
    /// Largest general model for long or explanation-heavy questions.
    Powerful,
    /// Code-specialized model.
    Coder,
}

impl ProfileKind {
    /// All kinds in listing order.
    pub const ALL: [ProfileKind; 4] = [
        ProfileKind::Fast,
        ProfileKind::Standard,
        ProfileKind::Powerful,
        ProfileKind::Coder,
    ];
}

/// Model and sampling configuration selected for a single message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestProfile {
    /// Which named profile this is.
    pub kind: ProfileKind,
    /// Upstream model identifier.
    pub model_id: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Maximum output tokens.
    pub max_tokens: u32,
    /// Upper bound for the upstream call, in seconds.
    pub timeout_seconds: u64,
    /// Human-readable mode label echoed back to the caller.
    pub mode_label: String,
}

impl RequestProfile {
    /// The upstream call deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// A validated inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    message: String,
}

impl ChatRequest {
    /// Trims the raw text and rejects it when nothing is left.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TutorgateError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TutorgateError::Validation(
                "message must not be empty".to_string(),
            ));
        }
        Ok(Self {
            message: trimmed.to_string(),
        })
    }

    /// The trimmed message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Length of the trimmed message in characters.
    pub fn char_len(&self) -> usize {
        self.message.chars().count()
    }
}

/// Provider-agnostic completion request built by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// The first completion choice returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReply {
    pub content: String,
}

/// The normalized response returned to the caller on every path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_set: Option<u64>,
    /// Unix seconds, captured when the envelope is built.
    pub timestamp: i64,
    /// HTTP status for the response line; not part of the JSON body.
    #[serde(skip)]
    pub http_status: u16,
}

impl ResponseEnvelope {
    /// A successful answer from the upstream model.
    pub fn success(
        response: String,
        model_used: impl Into<String>,
        elapsed: Duration,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            response,
            model_used: Some(model_used.into()),
            response_time: Some(format_elapsed(elapsed)),
            mode: Some(mode.into()),
            timeout_set: None,
            timestamp: unix_now(),
            http_status: 200,
        }
    }

    /// A failed request, optionally naming the model that was attempted.
    pub fn failure(response: String, model_used: Option<String>, http_status: u16) -> Self {
        Self {
            success: false,
            response,
            model_used,
            response_time: None,
            mode: None,
            timeout_set: None,
            timestamp: unix_now(),
            http_status,
        }
    }

    /// The upstream did not answer within `timeout_secs`.
    pub fn timed_out(response: String, model_used: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            timeout_set: Some(timeout_secs),
            ..Self::failure(response, Some(model_used.into()), 504)
        }
    }

    /// The inbound request was rejected before dispatch.
    pub fn rejected(response: String) -> Self {
        Self::failure(response, None, 400)
    }
}

/// Formats an elapsed duration as seconds with two decimals, e.g. `"1.25s"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
