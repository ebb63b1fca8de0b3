// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Interfaces of the external ledger client. Everything here is opaque to
//! the rest of the crate: requests go in, a success value or the client's
//! verbatim error text comes out. Timeouts and retries live behind these
//! boundaries, not in front of them.

use quill_config::config::PeerConfig;
use std::{fmt, path::PathBuf, time::Duration};
use thiserror::Error;

/// Failure reported by the external ledger client, carried verbatim.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ClientError(pub String);

impl ClientError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        ClientError(msg.into())
    }
}

/// Credential handed out by the membership service provider for a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningIdentity {
    pub user: String,
    pub msp_id: String,
}

/// Retry policy owned by the external client. The driver attaches it to
/// requests unchanged and never retries on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryProfile {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryProfile {
    fn default() -> RetryProfile {
        RetryProfile {
            attempts: 5,
            backoff: Duration::from_secs(2),
        }
    }
}

/// Packaged chaincode artifact as produced by the packaging collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChaincodePackage {
    pub label: String,
    pub bytes: Vec<u8>,
}

impl ChaincodePackage {
    pub fn new<S: Into<String>>(label: S, bytes: Vec<u8>) -> Self {
        ChaincodePackage {
            label: label.into(),
            bytes,
        }
    }
}

/// Endorsement policy attached at instantiation; evaluated by the ledger,
/// opaque here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignaturePolicy {
    AnyMemberOf(Vec<String>),
}

impl SignaturePolicy {
    pub fn any_member_of<I, S>(msp_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SignaturePolicy::AnyMemberOf(msp_ids.into_iter().map(Into::into).collect())
    }
}

/// Identifier of a submitted transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct SaveChannelRequest {
    pub channel_id: String,
    pub channel_config_path: PathBuf,
    pub signing_identities: Vec<SigningIdentity>,
    pub retry: RetryProfile,
}

#[derive(Clone, Debug)]
pub struct InstallRequest {
    pub name: String,
    pub path: String,
    pub version: String,
    pub package: ChaincodePackage,
    pub retry: RetryProfile,
}

/// Per-peer outcome of a chaincode installation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallResponse {
    pub target: String,
    pub status: u32,
}

#[derive(Clone, Debug)]
pub struct InstantiateRequest {
    pub name: String,
    pub path: String,
    pub version: String,
    pub args: Vec<Vec<u8>>,
    pub policy: SignaturePolicy,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstantiateResponse {
    pub transaction_id: TransactionId,
}

#[derive(Clone, Debug)]
pub struct QueryRequest {
    pub chaincode_id: String,
    pub fcn: String,
    pub args: Vec<Vec<u8>>,
}

/// Construction boundary for clients bound to one network topology. Clients
/// built from a provider must observe the topology the provider was
/// constructed with, overrides included.
pub trait ClientProvider {
    type Resource: ResourceClient;
    type Channel: ChannelClient;

    /// Resource-management client bound to `user`'s context in `org`.
    fn resource_client(&self, user: &str, org: &str) -> Result<Self::Resource, ClientError>;

    /// Channel client for `user` in `org`, bound to `channel_id`.
    fn channel_client(
        &self,
        channel_id: &str,
        user: &str,
        org: &str,
    ) -> Result<Self::Channel, ClientError>;

    /// Credential lookup for channel-creation signatures.
    fn signing_identity(&self, user: &str, org: &str) -> Result<SigningIdentity, ClientError>;

    /// Peer configurations the provider observes for `org`.
    fn org_peers(&self, org: &str) -> Result<Vec<PeerConfig>, ClientError>;
}

/// Channel and chaincode lifecycle operations of the external client.
pub trait ResourceClient {
    fn save_channel(&self, request: SaveChannelRequest) -> Result<TransactionId, ClientError>;

    fn join_channel(&self, channel_id: &str, retry: RetryProfile) -> Result<(), ClientError>;

    fn install_chaincode(
        &self,
        request: InstallRequest,
    ) -> Result<Vec<InstallResponse>, ClientError>;

    fn instantiate_chaincode(
        &self,
        channel_id: &str,
        request: InstantiateRequest,
    ) -> Result<InstantiateResponse, ClientError>;
}

/// Chaincode invocation against a joined channel.
pub trait ChannelClient {
    fn query(&self, request: QueryRequest) -> Result<Vec<u8>, ClientError>;
}
