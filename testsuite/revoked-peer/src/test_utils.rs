// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

use quill_config::{
    config::{MatchConfig, NetworkConfig, PeerChannelConfig, PeerConfig, PEER_ENTITY, SSL_TARGET_NAME_OVERRIDE},
    topology::{ChannelEdit, MatcherInsertion, OrganizationEdit, PeerSubstitution, SubstitutionPlan},
};
use quill_sdk::{
    provider::{ChaincodePackage, RetryProfile},
    scenario::{ChaincodeSpec, OrgSpec, Scenario},
};
use std::path::PathBuf;

pub const ORG1: &str = "org1";
pub const ORG2: &str = "org2";
pub const ORDERER_ORG: &str = "ordererorg";
pub const ADMIN_USER: &str = "Admin";
pub const ORG1_USER: &str = "User1";
pub const CHANNEL_ID: &str = "orgchannel";
pub const CONFIG_PATH: &str = "../../config/data/configs/network_test.yaml";

pub const REVOKED_PEER: &str = "peer0.org2.example.com";
pub const STAND_IN_PEER: &str = "peer1.org2.example.com";
pub const STAND_IN_URL: &str = "peer1.org2.example.com:9051";

pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn load_base_config() -> NetworkConfig {
    NetworkConfig::load(CONFIG_PATH).expect("failed to load base network config")
}

/// Redirects the revoked peer's slot to the stand-in instance: replace the
/// peer entry, re-point org2, swap the channel membership and front-insert a
/// matcher rule so the stand-in's hostname outranks the broad org2 pattern.
pub fn revoked_peer_plan() -> SubstitutionPlan {
    SubstitutionPlan {
        peer: PeerSubstitution {
            remove: format!("local.{}", REVOKED_PEER),
            insert: format!("local.{}", STAND_IN_PEER),
            config: PeerConfig::new(STAND_IN_URL)
                .with_grpc_option(SSL_TARGET_NAME_OVERRIDE, STAND_IN_PEER),
        },
        organization: OrganizationEdit {
            organization: ORG2.to_string(),
            peers: vec![STAND_IN_PEER.to_string()],
            msp_id: Some("Org2MSP".to_string()),
        },
        channel: ChannelEdit {
            channel: CHANNEL_ID.to_string(),
            remove: REVOKED_PEER.to_string(),
            insert: STAND_IN_PEER.to_string(),
            roles: PeerChannelConfig {
                endorsing_peer: true,
                chaincode_query: true,
                ledger_query: true,
                event_source: false,
            },
        },
        matcher: MatcherInsertion {
            entity: PEER_ENTITY.to_string(),
            rule: MatchConfig {
                pattern: r"peer1\.org2\.example\.com".to_string(),
                url_substitution: STAND_IN_URL.to_string(),
                mapped_host: format!("local.{}", STAND_IN_PEER),
                ..MatchConfig::default()
            },
        },
    }
}

pub fn revoked_peer_scenario() -> Scenario {
    Scenario {
        channel_id: CHANNEL_ID.to_string(),
        channel_config_path: PathBuf::from("data/channel/orgchannel.tx"),
        orderer_org: ORDERER_ORG.to_string(),
        orderer_admin: ADMIN_USER.to_string(),
        orgs: vec![
            OrgSpec {
                name: ORG1.to_string(),
                admin: ADMIN_USER.to_string(),
                msp_id: "Org1MSP".to_string(),
            },
            OrgSpec {
                name: ORG2.to_string(),
                admin: ADMIN_USER.to_string(),
                msp_id: "Org2MSP".to_string(),
            },
        ],
        user: ORG1_USER.to_string(),
        chaincode: ChaincodeSpec {
            name: "example_cc".to_string(),
            path: "github.com/example_cc".to_string(),
            version: "0".to_string(),
            package: ChaincodePackage::new("example_cc", b"example chaincode package".to_vec()),
            init_args: vec![
                b"init".to_vec(),
                b"a".to_vec(),
                b"100".to_vec(),
                b"b".to_vec(),
                b"200".to_vec(),
            ],
            query_fcn: "invoke".to_string(),
            query_args: vec![b"query".to_vec(), b"b".to_vec()],
        },
        instantiate_target: "peer0.org1.example.com".to_string(),
        retry: RetryProfile::default(),
    }
}
