// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Tutorgate.
//!
//! Exposes the single chat endpoint plus health, model catalog, metrics,
//! and a static index page. Each inbound request is validated, routed,
//! and dispatched on its own task; no state is shared between requests.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, MetricsRender, ServerConfig, build_router, start_server};
