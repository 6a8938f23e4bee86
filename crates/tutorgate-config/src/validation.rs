// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a present credential, sampling ranges, and threshold ordering.

use tutorgate_core::ProfileKind;

use crate::diagnostic::ConfigError;
use crate::model::{RoutingConfig, TutorgateConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TutorgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // The credential has no built-in fallback.
    let key_missing = config
        .upstream
        .api_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty());
    if key_missing {
        errors.push(ConfigError::MissingKey {
            key: "upstream.api_key".to_string(),
        });
    }

    if config.upstream.api_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "upstream.api_url must not be empty".to_string(),
        });
    }

    let top_p = config.upstream.top_p;
    if !(top_p > 0.0 && top_p <= 1.0) {
        errors.push(ConfigError::Validation {
            message: format!("upstream.top_p must be in (0, 1], got {top_p}"),
        });
    }

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "upstream.connect_timeout_secs must be positive".to_string(),
        });
    }

    if config.service.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.host must not be empty".to_string(),
        });
    }

    if let Err(routing_errors) = validate_routing(&config.routing) {
        errors.extend(routing_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate only the routing section.
///
/// Used by commands that classify locally and never contact the upstream.
pub fn validate_routing(routing: &RoutingConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if routing.standard_length_threshold >= routing.complex_length_threshold {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.standard_length_threshold ({}) must be less than \
                 routing.complex_length_threshold ({})",
                routing.standard_length_threshold, routing.complex_length_threshold
            ),
        });
    }

    for (section, keywords) in [
        ("code_keywords", &routing.code_keywords),
        ("complex_keywords", &routing.complex_keywords),
    ] {
        for (i, keyword) in keywords.iter().enumerate() {
            if keyword.is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("routing.{section}[{i}] must not be empty"),
                });
            }
        }
    }

    for kind in ProfileKind::ALL {
        let profile = routing.profiles.get(kind);
        let prefix = format!("routing.profiles.{kind}");

        if profile.model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{prefix}.model must not be empty"),
            });
        }
        if profile.label.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{prefix}.label must not be empty"),
            });
        }
        if !(0.0..=1.0).contains(&profile.temperature) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "{prefix}.temperature must be in [0, 1], got {}",
                    profile.temperature
                ),
            });
        }
        if profile.max_tokens == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{prefix}.max_tokens must be positive"),
            });
        }
        if profile.timeout_secs == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{prefix}.timeout_secs must be positive"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
