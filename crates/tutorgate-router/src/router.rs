// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile selection with an optional global override.
//!
//! Orchestrates model selection: global force > classify.

use tutorgate_config::model::{ProfileConfig, RoutingConfig};
use tutorgate_core::{ProfileKind, RequestProfile};
use tracing::info;

use crate::classifier::RequestClassifier;

const FORCED_REASON: &str = "global force_profile config";

/// Routing decision for one message.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    /// The selected profile.
    pub profile: RequestProfile,
    /// Human-readable reason for the routing decision.
    pub reason: String,
    /// Character count of the normalized message.
    pub char_len: usize,
}

/// A catalog entry for the models listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub kind: ProfileKind,
    pub model_id: String,
    pub description: String,
}

/// The four configured profiles, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: [RequestProfile; 4],
    descriptions: [String; 4],
}

impl ProfileCatalog {
    /// Resolve all profiles from routing configuration.
    pub fn from_config(config: &RoutingConfig) -> Self {
        let resolve = |kind: ProfileKind| to_profile(kind, config.profiles.get(kind));
        let describe = |kind: ProfileKind| config.profiles.get(kind).description.clone();
        Self {
            profiles: ProfileKind::ALL.map(resolve),
            descriptions: ProfileKind::ALL.map(describe),
        }
    }

    /// The profile for a given kind.
    pub fn get(&self, kind: ProfileKind) -> &RequestProfile {
        &self.profiles[Self::index(kind)]
    }

    /// Entries in listing order (fast, standard, powerful, coder).
    pub fn entries(&self) -> Vec<CatalogEntry> {
        ProfileKind::ALL
            .iter()
            .map(|&kind| CatalogEntry {
                kind,
                model_id: self.get(kind).model_id.clone(),
                description: self.descriptions[Self::index(kind)].clone(),
            })
            .collect()
    }

    fn index(kind: ProfileKind) -> usize {
        match kind {
            ProfileKind::Fast => 0,
            ProfileKind::Standard => 1,
            ProfileKind::Powerful => 2,
            ProfileKind::Coder => 3,
        }
    }
}

fn to_profile(kind: ProfileKind, config: &ProfileConfig) -> RequestProfile {
    RequestProfile {
        kind,
        model_id: config.model.clone(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        timeout_seconds: config.timeout_secs,
        mode_label: config.label.clone(),
    }
}

/// Selects a request profile for each message.
#[derive(Debug, Clone)]
pub struct ModelRouter {
    classifier: RequestClassifier,
    catalog: ProfileCatalog,
    force_profile: Option<ProfileKind>,
}

impl ModelRouter {
    /// Create a new model router with the given configuration.
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            classifier: RequestClassifier::from_config(config),
            catalog: ProfileCatalog::from_config(config),
            force_profile: config.force_profile,
        }
    }

    /// Route a message to a profile.
    ///
    /// Priority order:
    /// 1. Global `force_profile` config
    /// 2. Heuristic classification
    pub fn route(&self, message: &str) -> RoutingDecision {
        if let Some(forced) = self.force_profile {
            let profile = self.catalog.get(forced).clone();
            let char_len = message.to_lowercase().chars().count();
            info!(
                kind = %forced,
                model = profile.model_id.as_str(),
                timeout_secs = profile.timeout_seconds,
                chars = char_len,
                reason = FORCED_REASON,
                "request routed by force_profile"
            );
            return RoutingDecision {
                profile,
                reason: FORCED_REASON.to_string(),
                char_len,
            };
        }

        let classification = self.classifier.classify(message);
        let profile = self.catalog.get(classification.kind).clone();
        info!(
            kind = %classification.kind,
            model = profile.model_id.as_str(),
            timeout_secs = profile.timeout_seconds,
            chars = classification.char_len,
            reason = classification.reason,
            "request classified"
        );

        RoutingDecision {
            profile,
            reason: classification.reason.to_string(),
            char_len: classification.char_len,
        }
    }

    /// The resolved profile catalog.
    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RoutingConfig {
        RoutingConfig::default()
    }

    #[test]
    fn route_uses_classification() {
        let router = ModelRouter::new(&test_config());

        let decision = router.route("hi");
        assert_eq!(decision.profile.kind, ProfileKind::Fast);
        assert_eq!(decision.profile.model_id, "Qwen/Qwen2-7B-Instruct");
        assert_eq!(decision.profile.temperature, 0.3);
        assert_eq!(decision.profile.max_tokens, 800);
        assert_eq!(decision.profile.timeout_seconds, 10);
        assert_eq!(decision.profile.mode_label, "fast mode");

        let decision = router.route("how do I write a recursive function?");
        assert_eq!(decision.profile.kind, ProfileKind::Coder);
        assert_eq!(decision.profile.model_id, "Qwen/Qwen2.5-Coder-7B-Instruct");
        assert_eq!(decision.profile.temperature, 0.1);
        assert_eq!(decision.profile.max_tokens, 2000);
        assert_eq!(decision.profile.timeout_seconds, 20);
        assert_eq!(decision.reason, "code keyword");
    }

    #[test]
    fn route_selects_each_documented_profile() {
        let router = ModelRouter::new(&test_config());

        let powerful = router.route(&"b".repeat(101)).profile;
        assert_eq!(powerful.model_id, "Qwen/Qwen2.5-32B-Instruct");
        assert_eq!(powerful.temperature, 0.7);
        assert_eq!(powerful.timeout_seconds, 25);
        assert_eq!(powerful.mode_label, "complex mode");

        let standard = router.route(&"b".repeat(31)).profile;
        assert_eq!(standard.model_id, "Qwen/Qwen2.5-14B-Instruct");
        assert_eq!(standard.temperature, 0.5);
        assert_eq!(standard.max_tokens, 1500);
        assert_eq!(standard.timeout_seconds, 15);
        assert_eq!(standard.mode_label, "standard mode");
    }

    #[test]
    fn route_with_force_profile() {
        let mut config = test_config();
        config.force_profile = Some(ProfileKind::Powerful);
        let router = ModelRouter::new(&config);

        let decision = router.route("hi");
        assert_eq!(decision.profile.kind, ProfileKind::Powerful);
        assert_eq!(decision.reason, "global force_profile config");
        assert_eq!(decision.char_len, 2);
    }

    #[test]
    fn force_profile_overrides_code_keywords() {
        let mut config = test_config();
        config.force_profile = Some(ProfileKind::Fast);
        let router = ModelRouter::new(&config);

        let message = "def solve(): import numpy and explain the algorithm step by step";
        let decision = router.route(message);
        assert_eq!(decision.profile.kind, ProfileKind::Fast);
        assert_eq!(decision.reason, "global force_profile config");
        assert_eq!(decision.char_len, message.chars().count());
    }

    #[test]
    fn routing_is_deterministic() {
        let router = ModelRouter::new(&test_config());
        let message = "explain the mechanism of garbage collection in detail";
        assert_eq!(router.route(message), router.route(message));
    }

    #[test]
    fn catalog_lists_four_profiles_in_order() {
        let router = ModelRouter::new(&test_config());
        let entries = router.catalog().entries();
        let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, ProfileKind::ALL.to_vec());
        assert_eq!(entries[3].model_id, "Qwen/Qwen2.5-Coder-7B-Instruct");
        assert_eq!(entries[0].description, "Fastest response, simple questions");
    }
}
