// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles POST /api/chat, GET /api/health, GET /api/models, GET /metrics, GET /.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tutorgate_core::{ChatRequest, ResponseEnvelope};
use tutorgate_prometheus::record_rejected;
use tutorgate_security::excerpt;

use crate::server::GatewayState;

/// Characters of the incoming message that may appear in logs.
const LOG_EXCERPT_CHARS: usize = 30;

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Missing is treated like empty.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "running" while the process serves requests.
    pub status: String,
    /// Configured service name.
    pub service: String,
    /// Binary version.
    pub version: String,
    /// One entry per profile: "<model id> (<kind>)".
    pub available_models: Vec<String>,
    /// Unix seconds, like the chat envelope.
    pub timestamp: i64,
}

/// One entry of GET /api/models.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub description: String,
    pub mode: String,
    pub timeout_secs: u64,
}

/// Response body for GET /api/models.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub success: bool,
    /// Keyed by profile kind.
    pub models: BTreeMap<String, ModelInfo>,
}

/// POST /api/chat
///
/// Validates the message, routes it to a profile, dispatches it upstream,
/// and answers with the envelope's HTTP status.
pub async fn post_chat(
    State(state): State<GatewayState>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let replies = state.dispatcher.replies();

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "rejected chat request body");
            record_rejected();
            return envelope_response(ResponseEnvelope::rejected(replies.invalid_body()));
        }
    };

    let request = match ChatRequest::new(body.message.unwrap_or_default()) {
        Ok(request) => request,
        Err(_) => {
            record_rejected();
            return envelope_response(ResponseEnvelope::rejected(replies.empty_message()));
        }
    };

    let decision = state.router.route(request.message());
    info!(
        kind = %decision.profile.kind,
        chars = decision.char_len,
        excerpt = excerpt(request.message(), LOG_EXCERPT_CHARS),
        "chat request received"
    );

    let envelope = state.dispatcher.dispatch(&request, &decision.profile).await;
    envelope_response(envelope)
}

fn envelope_response(envelope: ResponseEnvelope) -> Response {
    let status =
        StatusCode::from_u16(envelope.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope)).into_response()
}

/// GET /api/health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let available_models = state
        .router
        .catalog()
        .entries()
        .into_iter()
        .map(|entry| format!("{} ({})", entry.model_id, entry.kind))
        .collect();

    Json(HealthResponse {
        status: "running".to_string(),
        service: state.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        available_models,
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// GET /api/models
pub async fn get_models(State(state): State<GatewayState>) -> Json<ModelsResponse> {
    let catalog = state.router.catalog();
    let models = catalog
        .entries()
        .into_iter()
        .map(|entry| {
            let profile = catalog.get(entry.kind);
            let info = ModelInfo {
                model: entry.model_id,
                description: entry.description,
                mode: profile.mode_label.clone(),
                timeout_secs: profile.timeout_seconds,
            };
            (entry.kind.to_string(), info)
        })
        .collect();

    Json(ModelsResponse {
        success: true,
        models,
    })
}

/// GET /metrics
///
/// Prometheus text exposition, or 404 when metrics are disabled.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.metrics_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /
pub async fn get_home(State(state): State<GatewayState>) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{name}</title></head>\n<body>\n\
         <h1>{name}</h1>\n\
         <p>Study-assistant relay. Send <code>POST /api/chat</code> with \
         <code>{{\"message\": \"...\"}}</code>.</p>\n\
         <ul>\n\
         <li><a href=\"/api/health\">/api/health</a></li>\n\
         <li><a href=\"/api/models\">/api/models</a></li>\n\
         </ul>\n</body>\n</html>\n",
        name = state.service_name
    ))
}
