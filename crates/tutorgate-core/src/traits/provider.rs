// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for chat-completion backends.

use async_trait::async_trait;

use crate::error::TutorgateError;
use crate::types::{CompletionReply, CompletionRequest};

/// A chat-completion backend.
///
/// Implementations perform exactly one upstream call per `complete` and
/// report non-200 answers as [`TutorgateError::Upstream`]. Deadlines are
/// applied by the caller.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Sends a completion request and returns the first choice.
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionReply, TutorgateError>;
}
