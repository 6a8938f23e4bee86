// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tutorgate.toml` > `~/.config/tutorgate/tutorgate.toml` >
//! `/etc/tutorgate/tutorgate.toml` with environment variable overrides via the
//! `TUTORGATE_` prefix and the bare `API_KEY` / `PORT` variables common on PaaS hosts.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TutorgateConfig;

/// System-wide config file path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tutorgate/tutorgate.toml";

/// Local config file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tutorgate.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tutorgate/tutorgate.toml` (system-wide)
/// 3. `~/.config/tutorgate/tutorgate.toml` (user XDG config)
/// 4. `./tutorgate.toml` (local directory)
/// 5. `API_KEY` and `PORT` environment variables
/// 6. `TUTORGATE_*` environment variables
pub fn load_config() -> Result<TutorgateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TutorgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TutorgateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TutorgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TutorgateConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TutorgateConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("tutorgate").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `TUTORGATE_UPSTREAM_API_KEY`
/// must map to `upstream.api_key`, not `upstream.api.key`.
pub fn env_provider() -> Env {
    Env::prefixed("TUTORGATE_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Sections a `TUTORGATE_*` variable may address.
const ENV_SECTIONS: [&str; 4] = ["service", "upstream", "routing", "replies"];

/// Profile tables under `[routing.profiles]`.
const ENV_PROFILES: [&str; 4] = ["fast", "standard", "powerful", "coder"];

/// Map a prefix-stripped env var name to a dotted config path.
///
/// Only the leading section (and, under `routing`, a leading `profiles_<kind>`)
/// is split off; the remainder is the field name verbatim.
/// `REPLIES_UPSTREAM_FAILURE` becomes `replies.upstream_failure`.
pub fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        else {
            continue;
        };
        if section == "routing" {
            if let Some(profile_rest) = rest.strip_prefix("profiles_") {
                for profile in ENV_PROFILES {
                    if let Some(field) = profile_rest
                        .strip_prefix(profile)
                        .and_then(|r| r.strip_prefix('_'))
                    {
                        return format!("routing.profiles.{profile}.{field}");
                    }
                }
            }
        }
        return format!("{section}.{rest}");
    }
    key
}

/// Bare `API_KEY` and `PORT` variables, as set by most container platforms.
pub fn legacy_env_provider() -> Env {
    Env::raw().only(&["API_KEY", "PORT"]).map(|key| {
        let key = key.as_str();
        if key.eq_ignore_ascii_case("api_key") {
            "upstream.api_key".into()
        } else if key.eq_ignore_ascii_case("port") {
            "service.port".into()
        } else {
            key.to_string().into()
        }
    })
}
