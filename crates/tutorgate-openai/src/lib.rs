// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completions provider for Tutorgate.
//!
//! This crate implements [`CompletionProvider`] for any endpoint that speaks
//! the `/v1/chat/completions` wire format (SiliconFlow, OpenAI, vLLM, ...).

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use tutorgate_config::model::UpstreamConfig;
use tutorgate_core::{CompletionProvider, CompletionReply, CompletionRequest, TutorgateError};

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// Chat-completions provider implementing [`CompletionProvider`].
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from the `[upstream]` configuration section.
    ///
    /// Fails when no credential is configured.
    pub fn new(config: &UpstreamConfig) -> Result<Self, TutorgateError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| TutorgateError::Config("upstream.api_key is not set".to_string()))?;

        let client = OpenAiClient::new(
            api_key,
            config.api_url.clone(),
            Duration::from_secs(config.connect_timeout_secs),
        )?;

        info!(api_url = client.api_url(), "chat-completions provider initialized");
        Ok(Self { client })
    }

    /// Converts a relay-level request into the wire request.
    fn to_wire(request: CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model,
            messages: vec![
                ApiMessage::system(request.system_prompt),
                ApiMessage::user(request.user_message),
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            stream: false,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, TutorgateError> {
        let wire = Self::to_wire(request);
        let response = self.client.complete(&wire).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TutorgateError::Provider {
                message: "completion response contained no choices".to_string(),
                source: None,
            })?;

        Ok(CompletionReply {
            content: choice.message.content.unwrap_or_default(),
        })
    }
}
