// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tutorgate serve` implementation.
//!
//! Wires configuration, the upstream provider, metrics, and the gateway
//! together and runs until a shutdown signal arrives.

use std::sync::Arc;

use tracing::info;
use tutorgate_config::TutorgateConfig;
use tutorgate_core::TutorgateError;
use tutorgate_gateway::{GatewayState, MetricsRender, ServerConfig};
use tutorgate_openai::OpenAiProvider;
use tutorgate_prometheus::MetricsExporter;

use crate::shutdown;

/// Runs the HTTP service until SIGINT/SIGTERM.
pub async fn run_serve(config: TutorgateConfig) -> Result<(), TutorgateError> {
    init_tracing(&config.service.log_level);

    info!(service = config.service.name.as_str(), "starting tutorgate serve");

    tutorgate_security::validate_url(&config.upstream.api_url)?;
    let provider = Arc::new(OpenAiProvider::new(&config.upstream)?);

    let metrics_render: Option<MetricsRender> = if config.service.metrics_enabled {
        let exporter = MetricsExporter::install()?;
        Some(Arc::new(move || exporter.render()))
    } else {
        None
    };

    let state = GatewayState::new(&config, provider, metrics_render);
    let server_config = ServerConfig {
        host: config.service.host.clone(),
        port: config.service.port,
    };

    let cancel = shutdown::install_signal_handler();
    tutorgate_gateway::start_server(&server_config, state, cancel.cancelled_owned()).await?;

    info!("tutorgate serve shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tutorgate={log_level},tower_http=info,warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
