// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Tutorgate.

use thiserror::Error;

/// The primary error type used across the classifier, dispatcher, and gateway.
#[derive(Debug, Error)]
pub enum TutorgateError {
    /// Configuration errors (invalid TOML, missing credential, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The inbound request was rejected before classification.
    #[error("validation error: {0}")]
    Validation(String),

    /// The completion API answered with a non-200 status.
    ///
    /// `detail` holds a truncated response body for server-side logs only.
    #[error("upstream returned status {status}")]
    Upstream { status: u16, detail: String },

    /// No upstream response arrived within the profile timeout.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Transport or decoding failures talking to the completion API.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound security policy violations (plain HTTP to a remote host, bad URL).
    #[error("security error: {0}")]
    Security(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TutorgateError {
    /// HTTP status code the gateway answers with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            TutorgateError::Validation(_) => 400,
            TutorgateError::Timeout { .. } => 504,
            TutorgateError::Upstream { .. }
            | TutorgateError::Provider { .. }
            | TutorgateError::Config(_)
            | TutorgateError::Security(_)
            | TutorgateError::Internal(_) => 500,
        }
    }

    /// Returns true when the upstream rejected the request itself (HTTP 400).
    pub fn is_bad_request(&self) -> bool {
        matches!(self, TutorgateError::Upstream { status: 400, .. })
    }
}
