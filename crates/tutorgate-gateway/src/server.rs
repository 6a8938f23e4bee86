// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tutorgate_config::TutorgateConfig;
use tutorgate_core::{CompletionProvider, ProfileKind, TutorgateError};
use tutorgate_dispatch::{DispatchSettings, Dispatcher, ReplyTemplates};
use tutorgate_router::ModelRouter;

use crate::handlers;

/// Shared state for axum request handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct GatewayState {
    /// Message classifier and profile catalog.
    pub router: Arc<ModelRouter>,
    /// Upstream dispatcher.
    pub dispatcher: Arc<Dispatcher>,
    /// Service name reported by the health endpoint.
    pub service_name: String,
    /// Optional Prometheus metrics render function.
    pub metrics_render: Option<MetricsRender>,
}

/// Render function backing GET /metrics.
pub type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

impl GatewayState {
    /// Assemble router and dispatcher from validated configuration.
    pub fn new(
        config: &TutorgateConfig,
        provider: Arc<dyn CompletionProvider>,
        metrics_render: Option<MetricsRender>,
    ) -> Self {
        let router = ModelRouter::new(&config.routing);
        let downgrade_to = config
            .routing
            .downgrade_on_bad_request
            .then(|| router.catalog().get(ProfileKind::Fast).clone());

        let dispatcher = Dispatcher::new(
            provider,
            DispatchSettings {
                system_prompt: config.upstream.system_prompt.clone(),
                top_p: config.upstream.top_p,
                downgrade_to,
            },
            ReplyTemplates::new(config.replies.clone()),
        );

        Self {
            router: Arc::new(router),
            dispatcher: Arc::new(dispatcher),
            service_name: config.service.name.clone(),
            metrics_render,
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the application router.
///
/// Routes:
/// - POST /api/chat
/// - GET /api/health
/// - GET /api/models
/// - GET /metrics
/// - GET /
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::get_home))
        .route("/api/chat", post(handlers::post_chat))
        .route("/api/health", get(handlers::get_health))
        .route("/api/models", get(handlers::get_models))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and run until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), TutorgateError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TutorgateError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TutorgateError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(debug.contains("8080"));
    }
}
