// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted completion provider for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured
//! outcomes, enabling fast tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tutorgate_core::{CompletionProvider, CompletionReply, CompletionRequest, TutorgateError};

/// One scripted provider outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Answer immediately with the text.
    Reply(String),
    /// Sleep, then answer with the text.
    Delayed(Duration, String),
    /// Fail as if the upstream answered with this HTTP status.
    Status(u16),
    /// Fail as a transport error.
    TransportError(String),
}

/// A mock provider that plays back scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
#[derive(Clone, Default)]
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            requests: Arc::default(),
        }
    }

    /// Add an outcome to the end of the queue.
    pub async fn push(&self, outcome: MockOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, TutorgateError> {
        self.requests.lock().await.push(request);
        let outcome = self.outcomes.lock().await.pop_front();

        match outcome.unwrap_or_else(|| MockOutcome::Reply("mock response".to_string())) {
            MockOutcome::Reply(content) => Ok(CompletionReply { content }),
            MockOutcome::Delayed(delay, content) => {
                tokio::time::sleep(delay).await;
                Ok(CompletionReply { content })
            }
            MockOutcome::Status(status) => Err(TutorgateError::Upstream {
                status,
                detail: format!("mock status {status}"),
            }),
            MockOutcome::TransportError(message) => Err(TutorgateError::Provider {
                message,
                source: None,
            }),
        }
    }
}
