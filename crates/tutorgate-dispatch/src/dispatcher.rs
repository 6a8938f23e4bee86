// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion dispatch with per-profile deadlines.
//!
//! [`Dispatcher::dispatch`] sends exactly one completion request (two when the
//! bad-request downgrade is enabled and triggers), and always returns a fully
//! populated [`ResponseEnvelope`]. No error crosses this boundary.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, warn};
use tutorgate_core::{
    ChatRequest, CompletionProvider, CompletionReply, CompletionRequest, RequestProfile,
    ResponseEnvelope, TutorgateError,
};
use tutorgate_prometheus::{Outcome, record_latency, record_request};
use tutorgate_security::{excerpt, redact, truncate_chars};

use crate::templates::{EXCERPT_CHARS, ReplyTemplates};

/// Upper bound on error text written to logs.
const MAX_LOGGED_ERROR_CHARS: usize = 200;

/// Request-independent dispatch parameters.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// System instruction sent ahead of every user message.
    pub system_prompt: String,
    /// Nucleus sampling parameter applied to every profile.
    pub top_p: f32,
    /// Profile retried once when the upstream answers 400.
    pub downgrade_to: Option<RequestProfile>,
}

/// Sends classified messages upstream and normalizes every outcome.
pub struct Dispatcher {
    provider: Arc<dyn CompletionProvider>,
    settings: DispatchSettings,
    replies: ReplyTemplates,
}

impl Dispatcher {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        settings: DispatchSettings,
        replies: ReplyTemplates,
    ) -> Self {
        Self {
            provider,
            settings,
            replies,
        }
    }

    /// The reply templates shared with the gateway's validation path.
    pub fn replies(&self) -> &ReplyTemplates {
        &self.replies
    }

    /// Dispatch a validated message under the given profile.
    pub async fn dispatch(&self, request: &ChatRequest, profile: &RequestProfile) -> ResponseEnvelope {
        let started = Instant::now();
        let mut result = self.attempt(request, profile).await;
        let mut used = profile;

        let fallback = match &result {
            Err(err) => self.downgrade_for(err, profile),
            Ok(_) => None,
        };
        if let Some(fallback) = fallback {
            warn!(
                from = profile.model_id.as_str(),
                to = fallback.model_id.as_str(),
                "upstream rejected request, retrying with fast profile"
            );
            result = self.attempt(request, fallback).await;
            used = fallback;
        }

        let elapsed = started.elapsed();
        let envelope = self.normalize(request, used, result, elapsed);
        record_latency(used.kind, elapsed.as_secs_f64());
        envelope
    }

    /// One upstream call bounded by the profile deadline.
    async fn attempt(
        &self,
        request: &ChatRequest,
        profile: &RequestProfile,
    ) -> Result<CompletionReply, TutorgateError> {
        let completion = CompletionRequest {
            model: profile.model_id.clone(),
            system_prompt: self.settings.system_prompt.clone(),
            user_message: request.message().to_string(),
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
            top_p: self.settings.top_p,
        };

        let deadline = profile.timeout();
        match tokio::time::timeout(deadline, self.provider.complete(completion)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(TutorgateError::Timeout { duration: deadline }),
        }
    }

    fn downgrade_for(
        &self,
        err: &TutorgateError,
        profile: &RequestProfile,
    ) -> Option<&RequestProfile> {
        if !err.is_bad_request() {
            return None;
        }
        self.settings
            .downgrade_to
            .as_ref()
            .filter(|fallback| fallback.kind != profile.kind && fallback.model_id != profile.model_id)
    }

    fn normalize(
        &self,
        request: &ChatRequest,
        profile: &RequestProfile,
        result: Result<CompletionReply, TutorgateError>,
        elapsed: std::time::Duration,
    ) -> ResponseEnvelope {
        let (envelope, outcome) = match result {
            Ok(reply) => {
                info!(
                    model = profile.model_id.as_str(),
                    chars = request.char_len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "completion succeeded"
                );
                (
                    ResponseEnvelope::success(
                        reply.content,
                        profile.model_id.clone(),
                        elapsed,
                        profile.mode_label.clone(),
                    ),
                    Outcome::Success,
                )
            }
            Err(err) => {
                let http_status = err.http_status();
                match err {
                    TutorgateError::Upstream { status, detail } => {
                        warn!(
                            model = profile.model_id.as_str(),
                            status,
                            detail = %detail,
                            "completion failed upstream"
                        );
                        (
                            ResponseEnvelope::failure(
                                self.replies.upstream_failure(status),
                                Some(profile.model_id.clone()),
                                http_status,
                            ),
                            Outcome::UpstreamError,
                        )
                    }
                    TutorgateError::Timeout { .. } => {
                        warn!(
                            model = profile.model_id.as_str(),
                            timeout_secs = profile.timeout_seconds,
                            excerpt = excerpt(request.message(), EXCERPT_CHARS),
                            "completion timed out"
                        );
                        (
                            ResponseEnvelope::timed_out(
                                self.replies.timeout(request.message(), profile.timeout_seconds),
                                profile.model_id.clone(),
                                profile.timeout_seconds,
                            ),
                            Outcome::Timeout,
                        )
                    }
                    other => {
                        let detail =
                            truncate_chars(&redact(&other.to_string(), &[]), MAX_LOGGED_ERROR_CHARS);
                        warn!(model = profile.model_id.as_str(), error = %detail, "completion failed");
                        (
                            ResponseEnvelope::failure(self.replies.internal_error(), None, http_status),
                            Outcome::InternalError,
                        )
                    }
                }
            }
        };

        record_request(profile.kind, outcome);
        envelope
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tutorgate_core::ProfileKind;

    use super::*;

    enum Step {
        Reply(&'static str),
        Delay(Duration, &'static str),
        Fail(fn() -> TutorgateError),
    }

    /// Provider that plays back scripted steps and records the requests it saw.
    struct ScriptedProvider {
        steps: Mutex<VecDeque<Step>>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<CompletionRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionReply, TutorgateError> {
            self.seen.lock().unwrap().push(request);
            let step = self.steps.lock().unwrap().pop_front();
            match step {
                Some(Step::Reply(text)) => Ok(CompletionReply {
                    content: text.to_string(),
                }),
                Some(Step::Delay(delay, text)) => {
                    tokio::time::sleep(delay).await;
                    Ok(CompletionReply {
                        content: text.to_string(),
                    })
                }
                Some(Step::Fail(make)) => Err(make()),
                None => Err(TutorgateError::Internal("script exhausted".into())),
            }
        }
    }

    fn profile(kind: ProfileKind, model: &str, timeout_seconds: u64) -> RequestProfile {
        RequestProfile {
            kind,
            model_id: model.to_string(),
            temperature: 0.5,
            max_tokens: 1500,
            timeout_seconds,
            mode_label: format!("{kind} mode"),
        }
    }

    fn fast() -> RequestProfile {
        profile(ProfileKind::Fast, "small-model", 10)
    }

    fn dispatcher(provider: Arc<ScriptedProvider>, downgrade: bool) -> Dispatcher {
        Dispatcher::new(
            provider,
            DispatchSettings {
                system_prompt: "You are a study assistant.".into(),
                top_p: 0.9,
                downgrade_to: downgrade.then(fast),
            },
            ReplyTemplates::default(),
        )
    }

    fn chat(message: &str) -> ChatRequest {
        ChatRequest::new(message).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn success_reports_model_mode_and_elapsed() {
        let provider = ScriptedProvider::new(vec![Step::Delay(Duration::from_millis(1250), "4")]);
        let d = dispatcher(provider.clone(), false);
        let standard = profile(ProfileKind::Standard, "mid-model", 15);

        let env = d.dispatch(&chat("what is 2 + 2?"), &standard).await;

        assert!(env.success);
        assert_eq!(env.http_status, 200);
        assert_eq!(env.response, "4");
        assert_eq!(env.model_used.as_deref(), Some("mid-model"));
        assert_eq!(env.mode.as_deref(), Some("standard mode"));
        assert_eq!(env.response_time.as_deref(), Some("1.25s"));
        assert!(env.timestamp > 0);
    }

    #[tokio::test]
    async fn request_carries_profile_parameters() {
        let provider = ScriptedProvider::new(vec![Step::Reply("ok")]);
        let d = dispatcher(provider.clone(), false);
        let coder = RequestProfile {
            temperature: 0.1,
            max_tokens: 2000,
            ..profile(ProfileKind::Coder, "coder-model", 20)
        };

        d.dispatch(&chat("  write a function  "), &coder).await;

        let seen = provider.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "coder-model");
        assert_eq!(seen[0].temperature, 0.1);
        assert_eq!(seen[0].max_tokens, 2000);
        assert_eq!(seen[0].top_p, 0.9);
        assert_eq!(seen[0].user_message, "write a function");
        assert_eq!(seen[0].system_prompt, "You are a study assistant.");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_yields_504_with_excerpt() {
        let provider = ScriptedProvider::new(vec![Step::Delay(Duration::from_secs(60), "late")]);
        let d = dispatcher(provider, false);
        let message = "Explain the mechanism of TCP congestion control in detail please";

        let env = d.dispatch(&chat(message), &profile(ProfileKind::Powerful, "big-model", 25)).await;

        assert!(!env.success);
        assert_eq!(env.http_status, 504);
        assert!(env.response.contains(&message[..30]));
        assert!(!env.response.contains(&message[..31]));
        assert!(env.response.contains("25s"));
        assert_eq!(env.model_used.as_deref(), Some("big-model"));
        assert_eq!(env.timeout_set, Some(25));
        assert!(env.response_time.is_none());
    }

    #[tokio::test]
    async fn upstream_status_yields_500_with_model() {
        let provider = ScriptedProvider::new(vec![Step::Fail(|| TutorgateError::Upstream {
            status: 503,
            detail: "overloaded".into(),
        })]);
        let d = dispatcher(provider, false);

        let env = d.dispatch(&chat("hi"), &fast()).await;

        assert!(!env.success);
        assert_eq!(env.http_status, 500);
        assert!(env.response.contains("503"));
        assert!(!env.response.contains("overloaded"));
        assert_eq!(env.model_used.as_deref(), Some("small-model"));
    }

    #[tokio::test]
    async fn transport_failure_yields_generic_500() {
        let provider = ScriptedProvider::new(vec![Step::Fail(|| TutorgateError::Provider {
            message: "connection refused".into(),
            source: None,
        })]);
        let d = dispatcher(provider, false);

        let env = d.dispatch(&chat("hi"), &fast()).await;

        assert!(!env.success);
        assert_eq!(env.http_status, 500);
        assert_eq!(env.response, "Internal server error, please try again later");
        assert!(env.model_used.is_none());
    }

    #[tokio::test]
    async fn failure_status_follows_error_taxonomy() {
        let failures: [fn() -> TutorgateError; 3] = [
            || TutorgateError::Upstream {
                status: 429,
                detail: String::new(),
            },
            || TutorgateError::Security("plain http to remote host".into()),
            || TutorgateError::Internal("decode failed".into()),
        ];
        for make in failures {
            let provider = ScriptedProvider::new(vec![Step::Fail(make)]);
            let env = dispatcher(provider, false).dispatch(&chat("hi"), &fast()).await;
            assert_eq!(env.http_status, make().http_status());
        }
    }

    #[tokio::test]
    async fn bad_request_without_downgrade_is_single_attempt() {
        let provider = ScriptedProvider::new(vec![
            Step::Fail(|| TutorgateError::Upstream {
                status: 400,
                detail: String::new(),
            }),
            Step::Reply("unused"),
        ]);
        let d = dispatcher(provider.clone(), false);

        let env = d.dispatch(&chat("hi"), &profile(ProfileKind::Powerful, "big-model", 25)).await;

        assert_eq!(env.http_status, 500);
        assert!(env.response.contains("400"));
        assert_eq!(provider.seen().len(), 1);
    }

    #[tokio::test]
    async fn bad_request_downgrades_once_to_fast() {
        let provider = ScriptedProvider::new(vec![
            Step::Fail(|| TutorgateError::Upstream {
                status: 400,
                detail: String::new(),
            }),
            Step::Reply("short answer"),
        ]);
        let d = dispatcher(provider.clone(), true);

        let env = d.dispatch(&chat("hi"), &profile(ProfileKind::Powerful, "big-model", 25)).await;

        assert!(env.success);
        assert_eq!(env.model_used.as_deref(), Some("small-model"));
        let seen = provider.seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].model, "small-model");
    }

    #[tokio::test]
    async fn fast_profile_never_downgrades() {
        let provider = ScriptedProvider::new(vec![
            Step::Fail(|| TutorgateError::Upstream {
                status: 400,
                detail: String::new(),
            }),
            Step::Reply("unused"),
        ]);
        let d = dispatcher(provider.clone(), true);

        let env = d.dispatch(&chat("hi"), &fast()).await;

        assert!(!env.success);
        assert_eq!(provider.seen().len(), 1);
    }

    #[tokio::test]
    async fn non_400_failures_do_not_downgrade() {
        let provider = ScriptedProvider::new(vec![
            Step::Fail(|| TutorgateError::Upstream {
                status: 429,
                detail: String::new(),
            }),
            Step::Reply("unused"),
        ]);
        let d = dispatcher(provider.clone(), true);

        d.dispatch(&chat("hi"), &profile(ProfileKind::Coder, "coder-model", 20)).await;

        assert_eq!(provider.seen().len(), 1);
    }
}
