// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runtime topology overrides. A [`SubstitutionPlan`] rewires a loaded
//! [`NetworkConfig`] to stand a different peer into an existing slot before
//! any client observes the configuration.

use crate::config::{
    Error, MatchConfig, NetworkConfig, PeerChannelConfig, PeerConfig,
};

/// Replaces one entry of the peer mapping with another. Removing an absent
/// key is a no-op; inserting over an existing key overwrites it.
#[derive(Clone, Debug)]
pub struct PeerSubstitution {
    pub remove: String,
    pub insert: String,
    pub config: PeerConfig,
}

impl PeerSubstitution {
    pub fn apply(&self, config: &mut NetworkConfig) {
        config.peers.remove(&self.remove);
        config
            .peers
            .insert(self.insert.clone(), self.config.clone());
    }
}

/// Rewrites an organization's peer set and, optionally, its MSP identifier.
#[derive(Clone, Debug)]
pub struct OrganizationEdit {
    pub organization: String,
    pub peers: Vec<String>,
    pub msp_id: Option<String>,
}

impl OrganizationEdit {
    pub fn apply(&self, config: &mut NetworkConfig) {
        let organization = config
            .organizations
            .entry(self.organization.clone())
            .or_default();
        organization.peers = self.peers.clone();
        if let Some(msp_id) = &self.msp_id {
            organization.msp_id = msp_id.clone();
        }
    }
}

/// Swaps one peer of a channel's membership for another, with explicit role
/// flags for the inserted peer. Removal of an absent member is a no-op.
#[derive(Clone, Debug)]
pub struct ChannelEdit {
    pub channel: String,
    pub remove: String,
    pub insert: String,
    pub roles: PeerChannelConfig,
}

impl ChannelEdit {
    pub fn apply(&self, config: &mut NetworkConfig) {
        let channel = config.channels.entry(self.channel.clone()).or_default();
        channel.peers.remove(&self.remove);
        channel.peers.insert(self.insert.clone(), self.roles);
    }
}

/// Front-inserts a matcher rule so it shadows every pre-existing rule of its
/// entity class, broader patterns included.
#[derive(Clone, Debug)]
pub struct MatcherInsertion {
    pub entity: String,
    pub rule: MatchConfig,
}

impl MatcherInsertion {
    pub fn apply(&self, config: &mut NetworkConfig) {
        config
            .entity_matchers
            .entry(self.entity.clone())
            .or_default()
            .insert(0, self.rule.clone());
    }
}

/// The full substitution: peer replacement, organization edit, channel edit
/// and matcher insertion, applied in that order. Organization and channel
/// edits reference the replacement peer, so the peer substitution has to land
/// first; the matcher insertion goes last because it is order-sensitive only
/// against the matcher list itself.
#[derive(Clone, Debug)]
pub struct SubstitutionPlan {
    pub peer: PeerSubstitution,
    pub organization: OrganizationEdit,
    pub channel: ChannelEdit,
    pub matcher: MatcherInsertion,
}

impl SubstitutionPlan {
    /// Applies the plan to a copy of `base` and validates the result. The
    /// caller's value is never mutated; on a dangling reference the produced
    /// configuration is discarded and the inconsistency returned instead.
    pub fn apply(&self, base: &NetworkConfig) -> Result<NetworkConfig, Error> {
        let mut config = base.clone();
        self.peer.apply(&mut config);
        self.organization.apply(&mut config);
        self.channel.apply(&mut config);
        self.matcher.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}
