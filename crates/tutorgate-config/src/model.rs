// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Tutorgate.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use tutorgate_core::ProfileKind;

/// Top-level Tutorgate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Every key except `upstream.api_key` has a default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TutorgateConfig {
    /// Service identity, bind address, and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Remote chat-completion API settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Classification rules and request profiles.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// User-facing reply templates.
    #[serde(default)]
    pub replies: ReplyConfig,
}

/// Service identity and HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Service name reported by the health endpoint.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Expose Prometheus metrics at `/metrics`.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

fn default_service_name() -> String {
    "Tutorgate Study Assistant".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

/// Remote chat-completion API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Full URL of the chat-completions endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer credential. Required; there is no built-in fallback.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Nucleus sampling parameter sent with every request.
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// System instruction prepended to every conversation.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// TCP connect timeout for the outbound client.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            top_p: default_top_p(),
            system_prompt: default_system_prompt(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("top_p", &self.top_p)
            .field("system_prompt", &self.system_prompt)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_api_url() -> String {
    "https://api.siliconflow.cn/v1/chat/completions".to_string()
}

fn default_top_p() -> f32 {
    0.9
}

fn default_system_prompt() -> String {
    "You are a professional study assistant. Answer concisely and accurately. \
     Break complex questions into numbered points, and give runnable examples \
     for code questions."
        .to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

/// Classification rules and the four request profiles.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Substrings that mark a programming question (matched case-insensitively).
    #[serde(default = "default_code_keywords")]
    pub code_keywords: Vec<String>,

    /// Substrings that mark a request for explanation or depth.
    #[serde(default = "default_complex_keywords")]
    pub complex_keywords: Vec<String>,

    /// Messages longer than this many characters are complex.
    #[serde(default = "default_complex_length_threshold")]
    pub complex_length_threshold: usize,

    /// Messages longer than this many characters use the standard profile.
    #[serde(default = "default_standard_length_threshold")]
    pub standard_length_threshold: usize,

    /// Send every message to one profile, bypassing classification.
    #[serde(default)]
    pub force_profile: Option<ProfileKind>,

    /// Retry once with the fast profile when the upstream answers 400.
    #[serde(default)]
    pub downgrade_on_bad_request: bool,

    /// Per-profile model and sampling settings.
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            code_keywords: default_code_keywords(),
            complex_keywords: default_complex_keywords(),
            complex_length_threshold: default_complex_length_threshold(),
            standard_length_threshold: default_standard_length_threshold(),
            force_profile: None,
            downgrade_on_bad_request: false,
            profiles: ProfilesConfig::default(),
        }
    }
}

fn default_code_keywords() -> Vec<String> {
    [
        "代码", "编程", "函数", "def ", "import ", "class ", "算法", "数据结构",
        "code", "programming", "function", "algorithm", "data structure",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_complex_keywords() -> Vec<String> {
    [
        "解释", "详细", "原理", "机制", "为什么", "如何工作", "分析",
        "explain", "detailed", "principle", "mechanism", "why", "how it works", "analyze",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_complex_length_threshold() -> usize {
    100
}

fn default_standard_length_threshold() -> usize {
    30
}

/// The four named profiles.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilesConfig {
    #[serde(default = "default_fast_profile")]
    pub fast: ProfileConfig,
    #[serde(default = "default_standard_profile")]
    pub standard: ProfileConfig,
    #[serde(default = "default_powerful_profile")]
    pub powerful: ProfileConfig,
    #[serde(default = "default_coder_profile")]
    pub coder: ProfileConfig,
}

impl ProfilesConfig {
    /// Look up the settings for one profile kind.
    pub fn get(&self, kind: ProfileKind) -> &ProfileConfig {
        match kind {
            ProfileKind::Fast => &self.fast,
            ProfileKind::Standard => &self.standard,
            ProfileKind::Powerful => &self.powerful,
            ProfileKind::Coder => &self.coder,
        }
    }
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            fast: default_fast_profile(),
            standard: default_standard_profile(),
            powerful: default_powerful_profile(),
            coder: default_coder_profile(),
        }
    }
}

/// Model and sampling settings for one profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Upstream model identifier.
    pub model: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Maximum output tokens.
    pub max_tokens: u32,
    /// Deadline for the upstream call, in seconds.
    pub timeout_secs: u64,
    /// Mode label echoed in successful responses.
    pub label: String,
    /// Description shown by the models endpoint.
    pub description: String,
}

fn default_fast_profile() -> ProfileConfig {
    ProfileConfig {
        model: "Qwen/Qwen2-7B-Instruct".to_string(),
        temperature: 0.3,
        max_tokens: 800,
        timeout_secs: 10,
        label: "fast mode".to_string(),
        description: "Fastest response, simple questions".to_string(),
    }
}

fn default_standard_profile() -> ProfileConfig {
    ProfileConfig {
        model: "Qwen/Qwen2.5-14B-Instruct".to_string(),
        temperature: 0.5,
        max_tokens: 1500,
        timeout_secs: 15,
        label: "standard mode".to_string(),
        description: "Balanced performance, medium questions".to_string(),
    }
}

fn default_powerful_profile() -> ProfileConfig {
    ProfileConfig {
        model: "Qwen/Qwen2.5-32B-Instruct".to_string(),
        temperature: 0.7,
        max_tokens: 2000,
        timeout_secs: 25,
        label: "complex mode".to_string(),
        description: "High quality answers, complex questions".to_string(),
    }
}

fn default_coder_profile() -> ProfileConfig {
    ProfileConfig {
        model: "Qwen/Qwen2.5-Coder-7B-Instruct".to_string(),
        temperature: 0.1,
        max_tokens: 2000,
        timeout_secs: 20,
        label: "code mode".to_string(),
        description: "Code specialist, programming questions".to_string(),
    }
}

/// User-facing reply templates.
///
/// Placeholders: `{status}` in `upstream_failure`; `{excerpt}` and
/// `{timeout}` in `timeout`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyConfig {
    /// Reply for an empty or whitespace-only message.
    #[serde(default = "default_empty_message")]
    pub empty_message: String,

    /// Reply for a missing or malformed JSON body.
    #[serde(default = "default_invalid_body")]
    pub invalid_body: String,

    /// Reply when the upstream answers with a non-200 status.
    #[serde(default = "default_upstream_failure")]
    pub upstream_failure: String,

    /// Reply when the upstream misses the profile deadline.
    #[serde(default = "default_timeout_reply")]
    pub timeout: String,

    /// Reply for any other failure.
    #[serde(default = "default_internal_error")]
    pub internal_error: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            empty_message: default_empty_message(),
            invalid_body: default_invalid_body(),
            upstream_failure: default_upstream_failure(),
            timeout: default_timeout_reply(),
            internal_error: default_internal_error(),
        }
    }
}

fn default_empty_message() -> String {
    "Message must not be empty".to_string()
}

fn default_invalid_body() -> String {
    "Please provide a JSON body with a \"message\" field".to_string()
}

fn default_upstream_failure() -> String {
    "Request failed (error {status})".to_string()
}

fn default_timeout_reply() -> String {
    "Question '{excerpt}...' timed out after {timeout}s.\n\n\
     Suggestions:\n\
     • Simplify the question\n\
     • Split complex questions into smaller ones\n\
     • Try again later"
        .to_string()
}

fn default_internal_error() -> String {
    "Internal server error, please try again later".to_string()
}
