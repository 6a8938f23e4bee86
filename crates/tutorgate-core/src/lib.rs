// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Tutorgate.
//!
//! This crate provides the error taxonomy, the request-scoped value types
//! (profiles, chat requests, response envelopes), and the provider trait
//! that the dispatcher calls into.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TutorgateError;
pub use traits::CompletionProvider;
pub use types::{
    ChatRequest, CompletionReply, CompletionRequest, ProfileKind, RequestProfile,
    ResponseEnvelope,
};
