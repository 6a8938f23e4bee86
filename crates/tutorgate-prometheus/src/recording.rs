// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics.

use metrics::{describe_counter, describe_histogram};
use tutorgate_core::ProfileKind;

/// How a dispatched request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    UpstreamError,
    Timeout,
    InternalError,
}

impl Outcome {
    /// Label value used on `tutorgate_requests_total`.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::UpstreamError => "upstream_error",
            Outcome::Timeout => "timeout",
            Outcome::InternalError => "internal_error",
        }
    }
}

/// Register all Tutorgate metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "tutorgate_requests_total",
        "Dispatched chat requests by profile kind and outcome"
    );
    describe_counter!(
        "tutorgate_rejected_total",
        "Chat requests rejected before classification"
    );
    describe_histogram!(
        "tutorgate_upstream_latency_seconds",
        "Completion API latency in seconds"
    );
}

/// Record a dispatched request.
pub fn record_request(kind: ProfileKind, outcome: Outcome) {
    metrics::counter!(
        "tutorgate_requests_total",
        "kind" => kind.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a request rejected by validation.
pub fn record_rejected() {
    metrics::counter!("tutorgate_rejected_total").increment(1);
}

/// Record upstream latency.
pub fn record_latency(kind: ProfileKind, seconds: f64) {
    metrics::histogram!("tutorgate_upstream_latency_seconds", "kind" => kind.to_string())
        .record(seconds);
}
