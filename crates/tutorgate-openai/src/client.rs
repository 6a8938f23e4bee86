// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! Provides [`OpenAiClient`] which handles bearer authentication, request
//! posting, and mapping of HTTP outcomes onto [`TutorgateError`].
//! There is no retry here: one call per request.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};
use tutorgate_core::TutorgateError;
use tutorgate_security::{redact, truncate_chars};

use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Upper bound on the error body kept for logs.
const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// HTTP client for chat-completions communication.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_url: String,
    secrets: Vec<String>,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - Bearer credential sent with every request
    /// * `api_url` - Full chat-completions URL
    /// * `connect_timeout` - Bound on TCP/TLS connection setup
    pub fn new(
        api_key: &str,
        api_url: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, TutorgateError> {
        let api_url = api_url.into();
        tutorgate_security::validate_url(&api_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| TutorgateError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = tutorgate_security::build_secure_client(
            reqwest::Client::builder().default_headers(headers),
            connect_timeout,
        )?;

        Ok(Self {
            client,
            api_url,
            secrets: vec![api_key.to_string()],
        })
    }

    /// The endpoint this client posts to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Sends one non-streaming completion request.
    ///
    /// Only HTTP 200 counts as success. Any other status becomes
    /// [`TutorgateError::Upstream`] with a redacted, truncated body.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TutorgateError> {
        let response = self
            .client
            .post(&self.api_url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, model = request.model.as_str(), "completion response received");

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let detail = truncate_chars(&redact(&body, &self.secrets), MAX_ERROR_DETAIL_CHARS);
            warn!(status = status.as_u16(), detail = %detail, "upstream rejected completion request");
            return Err(TutorgateError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| TutorgateError::Provider {
            message: format!("failed to parse completion response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> TutorgateError {
        let message = redact(&e.to_string(), &self.secrets);
        TutorgateError::Provider {
            message: format!("HTTP request failed: {message}"),
            source: Some(Box::new(e)),
        }
    }
}
