// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tutorgate integration tests.
//!
//! Provides a scripted provider and a harness that assembles the full
//! HTTP application for fast, deterministic tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Scripted completion provider
//! - [`TestHarness`] - In-process application driver

pub mod harness;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{MockOutcome, MockProvider};
