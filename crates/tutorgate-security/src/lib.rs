// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network security enforcement for Tutorgate.
//!
//! Provides the outbound TLS policy and secret redaction for anything
//! derived from upstream errors before it reaches the logs.

pub mod redact;
pub mod tls;

pub use redact::{excerpt, redact, truncate_chars};
pub use tls::{build_secure_client, is_localhost, validate_url};
