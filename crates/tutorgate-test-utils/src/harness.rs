// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete axum application with either a
//! scripted provider or the real chat-completions client pointed at a local
//! mock server, and drives it in-process via `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use tutorgate_config::TutorgateConfig;
use tutorgate_core::{CompletionProvider, TutorgateError};
use tutorgate_gateway::{GatewayState, build_router};
use tutorgate_openai::OpenAiProvider;

use crate::mock_provider::{MockOutcome, MockProvider};

/// Where completions come from.
enum Upstream {
    Mock(Vec<MockOutcome>),
    Http(String),
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: TutorgateConfig,
    upstream: Upstream,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = TutorgateConfig::default();
        config.upstream.api_key = Some("test-key".to_string());
        Self {
            config,
            upstream: Upstream::Mock(Vec::new()),
        }
    }

    /// Use a scripted provider with the given outcomes.
    pub fn with_mock_outcomes(mut self, outcomes: Vec<MockOutcome>) -> Self {
        self.upstream = Upstream::Mock(outcomes);
        self
    }

    /// Use the real chat-completions client against `api_url`.
    pub fn with_upstream_url(mut self, api_url: impl Into<String>) -> Self {
        self.upstream = Upstream::Http(api_url.into());
        self
    }

    /// Adjust the configuration before the app is assembled.
    pub fn configure(mut self, f: impl FnOnce(&mut TutorgateConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Build the test harness.
    pub fn build(self) -> Result<TestHarness, TutorgateError> {
        let mut config = self.config;
        let (provider, mock): (Arc<dyn CompletionProvider>, Option<MockProvider>) =
            match self.upstream {
                Upstream::Mock(outcomes) => {
                    let mock = MockProvider::with_outcomes(outcomes);
                    (Arc::new(mock.clone()), Some(mock))
                }
                Upstream::Http(api_url) => {
                    config.upstream.api_url = api_url;
                    (Arc::new(OpenAiProvider::new(&config.upstream)?), None)
                }
            };

        let app = build_router(GatewayState::new(&config, provider, None));
        Ok(TestHarness { app, mock, config })
    }
}

/// A fully assembled application for in-process requests.
pub struct TestHarness {
    app: Router,
    mock: Option<MockProvider>,
    config: TutorgateConfig,
}

impl TestHarness {
    /// Create a builder for configuring the test environment.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The scripted provider, when the harness uses one.
    pub fn mock(&self) -> Option<&MockProvider> {
        self.mock.as_ref()
    }

    /// The configuration the app was assembled from.
    pub fn config(&self) -> &TutorgateConfig {
        &self.config
    }

    /// POST /api/chat with `{"message": message}`.
    pub async fn chat(&self, message: &str) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({ "message": message }).to_string();
        self.post_raw("/api/chat", &body).await
    }

    /// POST a raw JSON body.
    pub async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::post(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// GET a JSON endpoint.
    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::get(path).body(Body::empty()).expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_round_trip_with_mock() {
        let harness = TestHarness::builder()
            .with_mock_outcomes(vec![MockOutcome::Reply("4".into())])
            .build()
            .unwrap();

        let (status, json) = harness.chat("what is 2 + 2?").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], "4");
        assert_eq!(json["model_used"], "Qwen/Qwen2-7B-Instruct");

        let seen = harness.mock().unwrap().requests().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user_message, "what is 2 + 2?");
    }

    #[test]
    fn http_upstream_requires_credential() {
        let result = TestHarness::builder()
            .configure(|c| c.upstream.api_key = None)
            .with_upstream_url("http://127.0.0.1:9/v1/chat/completions")
            .build();
        assert!(result.is_err());
    }
}
