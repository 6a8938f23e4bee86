// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete request pipeline.
//!
//! Each test assembles the full HTTP application in-process and points the
//! real chat-completions client at a local mock server. Tests are
//! independent and order-insensitive.

use std::time::Duration;

use tutorgate_core::ProfileKind;
use tutorgate_test_utils::{MockOutcome, TestHarness};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn completion(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-e2e",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}

async fn harness_for(server: &MockServer) -> TestHarness {
    TestHarness::builder()
        .with_upstream_url(format!("{}{COMPLETIONS_PATH}", server.uri()))
        .build()
        .unwrap()
}

// ---- Success path ----

#[tokio::test]
async fn short_question_uses_fast_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "Qwen/Qwen2-7B-Instruct",
            "max_tokens": 800,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("2 + 2 = 4")))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness_for(&server).await;
    let (status, json) = harness.chat("what is 2 + 2?").await;

    assert_eq!(status, 200);
    assert_eq!(json["success"], true);
    assert_eq!(json["response"], "2 + 2 = 4");
    assert_eq!(json["model_used"], "Qwen/Qwen2-7B-Instruct");
    assert_eq!(json["mode"], "fast mode");
    assert!(json["timestamp"].as_i64().unwrap() > 0);

    let response_time = json["response_time"].as_str().unwrap();
    let secs = response_time.strip_suffix('s').unwrap();
    assert_eq!(secs.split('.').nth(1).map(str::len), Some(2), "got {response_time}");
}

#[tokio::test]
async fn code_question_uses_coder_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "model": "Qwen/Qwen2.5-Coder-7B-Instruct",
            "max_tokens": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("def f(): ...")))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness_for(&server).await;
    let (status, json) = harness.chat(&format!("{} function", "x".repeat(500))).await;

    assert_eq!(status, 200);
    assert_eq!(json["mode"], "code mode");
}

#[tokio::test]
async fn explanation_request_uses_powerful_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "model": "Qwen/Qwen2.5-32B-Instruct"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("because")))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness_for(&server).await;
    let (_, json) = harness.chat("Why is the sky blue?").await;

    assert_eq!(json["mode"], "complex mode");
}

// ---- Validation ----

#[tokio::test]
async fn whitespace_message_is_rejected_without_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let harness = harness_for(&server).await;
    let (status, json) = harness.chat("   \n\t ").await;

    assert_eq!(status, 400);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let harness = TestHarness::builder().build().unwrap();
    let (status, json) = harness.post_raw("/api/chat", "message=hi").await;

    assert_eq!(status, 400);
    assert_eq!(json["success"], false);
    assert!(harness.mock().unwrap().requests().await.is_empty());
}

// ---- Failure normalization ----

#[tokio::test]
async fn upstream_503_becomes_500_with_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness_for(&server).await;
    let (status, json) = harness.chat("hello").await;

    assert_eq!(status, 500);
    assert_eq!(json["success"], false);
    assert_eq!(json["model_used"], "Qwen/Qwen2-7B-Instruct");
    let reply = json["response"].as_str().unwrap();
    assert!(reply.contains("503"));
    assert!(!reply.contains("overloaded"));
}

#[tokio::test]
async fn upstream_timeout_becomes_504_with_excerpt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let harness = TestHarness::builder()
        .with_upstream_url(format!("{}{COMPLETIONS_PATH}", server.uri()))
        .configure(|c| c.routing.profiles.fast.timeout_secs = 1)
        .build()
        .unwrap();

    let message = "hello there, quick one";
    let (status, json) = harness.chat(message).await;

    assert_eq!(status, 504);
    assert_eq!(json["success"], false);
    assert_eq!(json["timeout_set"], 1);
    assert_eq!(json["model_used"], "Qwen/Qwen2-7B-Instruct");
    assert!(json["response"].as_str().unwrap().contains(message));
}

#[tokio::test]
async fn unreachable_upstream_is_generic_500() {
    // Nothing listens on the discard port.
    let harness = TestHarness::builder()
        .with_upstream_url("http://127.0.0.1:9/v1/chat/completions")
        .build()
        .unwrap();

    let (status, json) = harness.chat("hi").await;

    assert_eq!(status, 500);
    assert_eq!(json["response"], "Internal server error, please try again later");
    assert!(json.get("model_used").is_none());
}

#[tokio::test]
async fn bad_request_downgrade_is_opt_in() {
    let harness = TestHarness::builder()
        .with_mock_outcomes(vec![
            MockOutcome::Status(400),
            MockOutcome::Reply("fast answer".into()),
        ])
        .configure(|c| c.routing.downgrade_on_bad_request = true)
        .build()
        .unwrap();

    let (status, json) = harness.chat("explain how it works").await;

    assert_eq!(status, 200);
    assert_eq!(json["model_used"], "Qwen/Qwen2-7B-Instruct");
    let seen = harness.mock().unwrap().requests().await;
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].model, "Qwen/Qwen2.5-32B-Instruct");
}

// ---- Informational endpoints ----

#[tokio::test]
async fn health_reports_four_models() {
    let harness = TestHarness::builder().build().unwrap();
    let (status, json) = harness.get("/api/health").await;

    assert_eq!(status, 200);
    assert_eq!(json["status"], "running");
    assert_eq!(json["available_models"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn models_reflect_configuration() {
    let harness = TestHarness::builder()
        .configure(|c| c.routing.profiles.coder.model = "deepseek-coder".to_string())
        .build()
        .unwrap();
    let (_, json) = harness.get("/api/models").await;

    assert_eq!(json["success"], true);
    assert_eq!(json["models"]["coder"]["model"], "deepseek-coder");
    assert_eq!(json["models"]["fast"]["mode"], "fast mode");
}

#[tokio::test]
async fn forced_profile_overrides_classification() {
    let harness = TestHarness::builder()
        .with_mock_outcomes(vec![MockOutcome::Reply("ok".into())])
        .configure(|c| c.routing.force_profile = Some(ProfileKind::Powerful))
        .build()
        .unwrap();

    harness.chat("hi").await;
    let seen = harness.mock().unwrap().requests().await;
    assert_eq!(seen[0].model, harness.config().routing.profiles.powerful.model);
}
