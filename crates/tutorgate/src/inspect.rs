// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline inspection commands: `classify` and `config`.

use tutorgate_config::TutorgateConfig;
use tutorgate_config::model::RoutingConfig;
use tutorgate_core::{ChatRequest, TutorgateError};
use tutorgate_router::ModelRouter;

const REDACTED: &str = "[redacted]";

/// Route `message` and render the decision as pretty JSON.
///
/// The message is trimmed and validated the same way `/api/chat` does it.
pub fn classify_report(routing: &RoutingConfig, message: &str) -> Result<String, TutorgateError> {
    let request = ChatRequest::new(message)?;
    let decision = ModelRouter::new(routing).route(request.message());
    let report = serde_json::json!({
        "profile": decision.profile,
        "reason": decision.reason,
        "chars": decision.char_len,
    });
    serde_json::to_string_pretty(&report)
        .map_err(|e| TutorgateError::Internal(format!("failed to render classification: {e}")))
}

/// Render the effective configuration as TOML with the credential redacted.
pub fn render_config(config: &TutorgateConfig) -> Result<String, TutorgateError> {
    let mut shown = config.clone();
    if shown.upstream.api_key.is_some() {
        shown.upstream.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| TutorgateError::Internal(format!("failed to render configuration: {e}")))
}
