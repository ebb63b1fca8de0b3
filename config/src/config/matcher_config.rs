// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::config::{Error, PeerConfig, SSL_TARGET_NAME_OVERRIDE};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One pattern-substitution rule of an entity matcher list. Rules are
/// consulted in list order and the first matching pattern wins, so a rule
/// meant to shadow a broader one must sit in front of it.
///
/// Substitution fields are three-valued: absent leaves the mapped peer's
/// field untouched, an empty string clears it, anything else replaces it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub pattern: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url_substitution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_url_substitution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_target_override_substitution: Option<String>,
    // Key of the peer-mapping entry the matched name stands for.
    pub mapped_host: String,
}

impl MatchConfig {
    pub fn matches(&self, name: &str) -> Result<bool, Error> {
        let pattern = Regex::new(&self.pattern)
            .map_err(|e| Error::Pattern(self.pattern.clone(), e))?;
        Ok(pattern.is_match(name))
    }

    /// Applies this rule's substitutions on top of the mapped peer's entry.
    pub fn rewrite(&self, mapped: &PeerConfig) -> PeerConfig {
        let mut peer = mapped.clone();
        if !self.url_substitution.is_empty() {
            peer.url = self.url_substitution.clone();
        }
        match &self.event_url_substitution {
            Some(substitution) if substitution.is_empty() => peer.event_url = None,
            Some(substitution) => peer.event_url = Some(substitution.clone()),
            None => {}
        }
        match &self.ssl_target_override_substitution {
            Some(substitution) if substitution.is_empty() => {
                peer.grpc_options.remove(SSL_TARGET_NAME_OVERRIDE);
            }
            Some(substitution) => {
                peer.grpc_options
                    .insert(SSL_TARGET_NAME_OVERRIDE.to_string(), substitution.clone());
            }
            None => {}
        }
        peer
    }
}
