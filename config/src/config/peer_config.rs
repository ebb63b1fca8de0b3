// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transport option key carrying the TLS server-name override for a peer.
pub const SSL_TARGET_NAME_OVERRIDE: &str = "ssl-target-name-override";

/// Connection details for a single network peer. Keyed in the peer mapping
/// by its logical, organization-qualified name.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeerConfig {
    pub url: String,
    // The address the peer emits block and chaincode events on, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_url: Option<String>,
    // Free-form transport overrides handed to the connection layer untouched.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub grpc_options: BTreeMap<String, String>,
}

impl PeerConfig {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            event_url: None,
            grpc_options: BTreeMap::new(),
        }
    }

    pub fn with_grpc_option<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.grpc_options.insert(key.into(), value.into());
        self
    }
}
