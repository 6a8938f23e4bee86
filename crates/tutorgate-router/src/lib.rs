// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request classification and profile routing for Tutorgate.
//!
//! This crate provides:
//! - [`RequestClassifier`]: ordered rule-table classification (zero-cost, zero-latency)
//! - [`ModelRouter`]: profile selection with an optional global override
//!
//! The router runs before every upstream call, choosing the model,
//! sampling parameters, token budget, and timeout for the message.

pub mod classifier;
pub mod router;

pub use classifier::{Classification, Predicate, RequestClassifier, RoutingRule};
pub use router::{CatalogEntry, ModelRouter, ProfileCatalog, RoutingDecision};
