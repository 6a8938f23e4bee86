// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TLS enforcement for the outbound inference connection.
//!
//! Provides a reqwest client builder with a TLS 1.2 minimum and URL
//! validation that blocks plaintext connections to remote hosts.

use std::time::Duration;

use tracing::error;
use tutorgate_core::TutorgateError;

/// Build a reqwest::Client with security defaults.
///
/// - Minimum TLS 1.2 for all connections.
/// - Bounded connect phase; the overall request deadline is applied per call.
pub fn build_secure_client(
    builder: reqwest::ClientBuilder,
    connect_timeout: Duration,
) -> Result<reqwest::Client, TutorgateError> {
    builder
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|e| {
            error!("failed to build secure HTTP client: {e}");
            TutorgateError::Security(format!("failed to build secure HTTP client: {e}"))
        })
}

/// Validate a URL for security policy compliance.
///
/// - Localhost URLs (127.0.0.1, ::1, localhost) are allowed with any scheme.
/// - Remote URLs MUST use HTTPS.
pub fn validate_url(url: &str) -> Result<(), TutorgateError> {
    let parsed =
        url::Url::parse(url).map_err(|e| TutorgateError::Security(format!("invalid URL: {e}")))?;

    let host = parsed.host_str().unwrap_or("");
    if is_localhost(host) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        error!(url = %url, "TLS required for remote connections");
        return Err(TutorgateError::Security(
            "TLS required for remote connections -- use HTTPS".to_string(),
        ));
    }

    Ok(())
}

/// Check if an address refers to localhost.
pub fn is_localhost(addr: &str) -> bool {
    matches!(addr, "127.0.0.1" | "::1" | "localhost" | "[::1]") || addr.starts_with("127.")
}
