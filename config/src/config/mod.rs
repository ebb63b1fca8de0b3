// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{Read, Write},
    path::Path,
};

mod channel_config;
pub use channel_config::*;
mod error;
pub use error::*;
mod matcher_config;
pub use matcher_config::*;
mod organization_config;
pub use organization_config::*;
mod peer_config;
pub use peer_config::*;

/// Entity class under which peer address matchers are registered.
pub const PEER_ENTITY: &str = "peer";

/// NetworkConfig pulls the static topology of a member network from the
/// config file: the peers that can be reached, the organizations running
/// them, per-channel membership and the entity matchers used to resolve
/// logical peer names. The file is broken up into sections so that each
/// section can be passed around on its own.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub peers: BTreeMap<String, PeerConfig>,
    pub organizations: BTreeMap<String, OrganizationConfig>,
    pub channels: BTreeMap<String, ChannelConfig>,
    pub entity_matchers: BTreeMap<String, Vec<MatchConfig>>,
}

impl NetworkConfig {
    /// Reads the config file and validates the topology before returning it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config = Self::load_config(path)?;
        if config.peers.is_empty() {
            return Err(Error::Missing("peers"));
        }
        config.validate()?;
        Ok(config)
    }

    /// Resolves a logical peer name to its connection config. Direct entries
    /// win; otherwise the first matching `peer` entity matcher decides, with
    /// its substitutions applied on top of the mapped entry. A winning rule
    /// whose mapped host is absent from the peer mapping resolves to nothing,
    /// it does not fall through to later rules.
    pub fn resolve_peer(&self, name: &str) -> Result<Option<PeerConfig>, Error> {
        if let Some(peer) = self.peers.get(name) {
            return Ok(Some(peer.clone()));
        }
        for rule in self.peer_matchers() {
            if rule.matches(name)? {
                return Ok(self
                    .peers
                    .get(&rule.mapped_host)
                    .map(|mapped| rule.rewrite(mapped)));
            }
        }
        Ok(None)
    }

    pub fn peer_matchers(&self) -> &[MatchConfig] {
        self.entity_matchers
            .get(PEER_ENTITY)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Checks that every peer referenced by an organization or a channel
    /// resolves to an entry in the peer mapping, and that channel members
    /// belong to some organization. Matcher rules shadowed by a
    /// higher-precedence rule are not required to stay resolvable.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, organization) in &self.organizations {
            for peer in &organization.peers {
                invariant(
                    self.resolve_peer(peer)?.is_some(),
                    format!("organization {} references unknown peer {}", name, peer),
                )?;
            }
        }
        for (channel_id, channel) in &self.channels {
            for peer in channel.peers.keys() {
                invariant(
                    self.resolve_peer(peer)?.is_some(),
                    format!("channel {} references unknown peer {}", channel_id, peer),
                )?;
                invariant(
                    self.organizations
                        .values()
                        .any(|organization| organization.peers.contains(peer)),
                    format!(
                        "channel {} peer {} does not belong to any organization",
                        channel_id, peer
                    ),
                )?;
            }
        }
        Ok(())
    }
}

pub trait PersistableConfig: Serialize + DeserializeOwned {
    fn load_config<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut file =
            File::open(path).map_err(|e| Error::IO(path.display().to_string(), e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| Error::IO(path.display().to_string(), e))?;
        Self::parse(&contents)
    }

    fn save_config<P: AsRef<Path>>(&self, output_file: P) -> Result<(), Error> {
        let contents = serde_yaml::to_string(&self)
            .map_err(|e| Error::Yaml(std::any::type_name::<Self>().to_string(), e))?;
        let mut file = File::create(output_file.as_ref())
            .map_err(|e| Error::IO(output_file.as_ref().display().to_string(), e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| Error::IO(output_file.as_ref().display().to_string(), e))?;
        Ok(())
    }

    fn parse(serialized: &str) -> Result<Self, Error> {
        serde_yaml::from_str(serialized)
            .map_err(|e| Error::Yaml(std::any::type_name::<Self>().to_string(), e))
    }
}

impl<T: ?Sized> PersistableConfig for T where T: Serialize + DeserializeOwned {}
