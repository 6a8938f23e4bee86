// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion dispatch for Tutorgate.
//!
//! Takes a validated message and its routed profile, performs the single
//! upstream call under the profile deadline, and maps every outcome onto a
//! [`ResponseEnvelope`](tutorgate_core::ResponseEnvelope).

pub mod dispatcher;
pub mod templates;

pub use dispatcher::{DispatchSettings, Dispatcher};
pub use templates::ReplyTemplates;
