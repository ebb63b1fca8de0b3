// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Drives the revoked-peer sequence: channel setup, join, chaincode install
//! and instantiation must succeed, then a single query against the overridden
//! topology must be refused. The refusal is the property under test, so it is
//! reported as the scenario's success and an accepted query as its failure.

use crate::provider::{
    ChaincodePackage, ChannelClient, ClientError, ClientProvider, InstallRequest,
    InstantiateRequest, InstantiateResponse, QueryRequest, ResourceClient, RetryProfile,
    SaveChannelRequest, SignaturePolicy, TransactionId,
};
use quill_config::config::PeerConfig;
use std::{fmt, path::PathBuf};
use thiserror::Error;
use tracing::info;

/// One step of the fixed sequence; names the origin of a setup failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    CreateChannel,
    JoinChannel(String),
    InstallChaincode(String),
    InstantiateChaincode,
    LoadOrgPeers(String),
    ConnectChannel,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Step::CreateChannel => write!(f, "create-channel"),
            Step::JoinChannel(org) => write!(f, "join-channel[{}]", org),
            Step::InstallChaincode(org) => write!(f, "install-chaincode[{}]", org),
            Step::InstantiateChaincode => write!(f, "instantiate-chaincode"),
            Step::LoadOrgPeers(org) => write!(f, "load-org-peers[{}]", org),
            Step::ConnectChannel => write!(f, "connect-channel"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A setup step failed; the scenario aborted there with the client's
    /// diagnostic. Nothing after the failing step was attempted.
    #[error("setup step {step} failed: {source}")]
    Setup { step: Step, source: ClientError },
    /// The final query was accepted even though the channel membership
    /// includes a peer whose identity must not validate.
    #[error("query was accepted with a {} byte payload, expected an identity-validation rejection", payload.len())]
    UnexpectedAcceptance { payload: Vec<u8> },
}

/// Reason text the ledger returned when it refused the final query. Kept
/// verbatim; the driver asserts only that a refusal happened, not why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection(pub String);

/// Everything a completed run produced, step by step.
#[derive(Clone, Debug)]
pub struct ScenarioReport {
    pub channel_transaction: TransactionId,
    pub instantiate_response: InstantiateResponse,
    pub org_peers: Vec<(String, Vec<PeerConfig>)>,
    pub rejection: Rejection,
}

/// One member organization taking part in the scenario.
#[derive(Clone, Debug)]
pub struct OrgSpec {
    pub name: String,
    pub admin: String,
    pub msp_id: String,
}

/// The chaincode exercised by the scenario, with its packaged artifact and
/// the invocation used for the final query.
#[derive(Clone, Debug)]
pub struct ChaincodeSpec {
    pub name: String,
    pub path: String,
    pub version: String,
    pub package: ChaincodePackage,
    pub init_args: Vec<Vec<u8>>,
    pub query_fcn: String,
    pub query_args: Vec<Vec<u8>>,
}

/// Static description of a run: who signs, where the channel config lives,
/// which chaincode is exercised and which peer the instantiation targets.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub channel_id: String,
    pub channel_config_path: PathBuf,
    pub orderer_org: String,
    pub orderer_admin: String,
    pub orgs: Vec<OrgSpec>,
    pub user: String,
    pub chaincode: ChaincodeSpec,
    pub instantiate_target: String,
    pub retry: RetryProfile,
}

impl Scenario {
    /// Runs the sequence to completion. Returns the report when the final
    /// query is refused; any earlier failure, and an accepted final query,
    /// are errors.
    pub fn run<P: ClientProvider>(&self, provider: &P) -> Result<ScenarioReport, ScenarioError> {
        let setup = |step: Step| move |source| ScenarioError::Setup { step, source };

        if self.orgs.is_empty() {
            return Err(ScenarioError::Setup {
                step: Step::CreateChannel,
                source: ClientError::new("scenario requires at least one member organization"),
            });
        }

        let orderer_client = provider
            .resource_client(&self.orderer_admin, &self.orderer_org)
            .map_err(setup(Step::CreateChannel))?;

        let mut identities = Vec::new();
        for org in &self.orgs {
            let identity = provider
                .signing_identity(&org.admin, &org.name)
                .map_err(setup(Step::CreateChannel))?;
            identities.push(identity);
        }

        let transaction = orderer_client
            .save_channel(SaveChannelRequest {
                channel_id: self.channel_id.clone(),
                channel_config_path: self.channel_config_path.clone(),
                signing_identities: identities,
                retry: self.retry,
            })
            .map_err(setup(Step::CreateChannel))?;
        if transaction.is_empty() {
            return Err(ScenarioError::Setup {
                step: Step::CreateChannel,
                source: ClientError::new("channel creation returned an empty transaction id"),
            });
        }
        info!(channel = %self.channel_id, transaction = %transaction, "channel created");

        let mut org_clients = Vec::new();
        for org in &self.orgs {
            let client = provider
                .resource_client(&org.admin, &org.name)
                .map_err(setup(Step::JoinChannel(org.name.clone())))?;
            client
                .join_channel(&self.channel_id, self.retry)
                .map_err(setup(Step::JoinChannel(org.name.clone())))?;
            info!(org = %org.name, channel = %self.channel_id, "peers joined channel");
            org_clients.push((org, client));
        }

        for (org, client) in &org_clients {
            client
                .install_chaincode(InstallRequest {
                    name: self.chaincode.name.clone(),
                    path: self.chaincode.path.clone(),
                    version: self.chaincode.version.clone(),
                    package: self.chaincode.package.clone(),
                    retry: self.retry,
                })
                .map_err(setup(Step::InstallChaincode(org.name.clone())))?;
            info!(org = %org.name, chaincode = %self.chaincode.name, "chaincode installed");
        }

        let policy =
            SignaturePolicy::any_member_of(self.orgs.iter().map(|org| org.msp_id.clone()));
        let (_, instantiating_client) = &org_clients[0];
        let response = instantiating_client
            .instantiate_chaincode(
                &self.channel_id,
                InstantiateRequest {
                    name: self.chaincode.name.clone(),
                    path: self.chaincode.path.clone(),
                    version: self.chaincode.version.clone(),
                    args: self.chaincode.init_args.clone(),
                    policy,
                    target: self.instantiate_target.clone(),
                },
            )
            .map_err(setup(Step::InstantiateChaincode))?;
        if response.transaction_id.is_empty() {
            return Err(ScenarioError::Setup {
                step: Step::InstantiateChaincode,
                source: ClientError::new("instantiation returned an empty response"),
            });
        }
        info!(chaincode = %self.chaincode.name, transaction = %response.transaction_id, "chaincode instantiated");

        let mut org_peers = Vec::new();
        for org in &self.orgs {
            let peers = provider
                .org_peers(&org.name)
                .map_err(setup(Step::LoadOrgPeers(org.name.clone())))?;
            org_peers.push((org.name.clone(), peers));
        }

        let channel_client = provider
            .channel_client(&self.channel_id, &self.user, &self.orgs[0].name)
            .map_err(setup(Step::ConnectChannel))?;
        match channel_client.query(QueryRequest {
            chaincode_id: self.chaincode.name.clone(),
            fcn: self.chaincode.query_fcn.clone(),
            args: self.chaincode.query_args.clone(),
        }) {
            Err(refusal) => {
                info!(reason = %refusal, "query refused as required");
                Ok(ScenarioReport {
                    channel_transaction: transaction,
                    instantiate_response: response,
                    org_peers,
                    rejection: Rejection(refusal.0),
                })
            }
            Ok(payload) => Err(ScenarioError::UnexpectedAcceptance { payload }),
        }
    }
}
