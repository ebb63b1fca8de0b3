// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-channel membership: which peers participate and in which roles.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub peers: BTreeMap<String, PeerChannelConfig>,
}

/// Role flags of one peer on one channel.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeerChannelConfig {
    pub endorsing_peer: bool,
    pub chaincode_query: bool,
    pub ledger_query: bool,
    pub event_source: bool,
}

impl Default for PeerChannelConfig {
    fn default() -> PeerChannelConfig {
        PeerChannelConfig {
            endorsing_peer: true,
            chaincode_query: true,
            ledger_query: true,
            event_source: true,
        }
    }
}
