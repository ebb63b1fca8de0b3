// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{mock_ledger::MockLedger, test_utils};
use quill_config::config::NetworkConfig;
use quill_sdk::{
    provider::ClientProvider,
    scenario::{ScenarioError, Step},
};

fn overridden_config() -> anyhow::Result<NetworkConfig> {
    let base = test_utils::load_base_config();
    Ok(test_utils::revoked_peer_plan().apply(&base)?)
}

#[test]
fn revoked_peer_query_is_rejected() -> anyhow::Result<()> {
    test_utils::init_logging();

    let ledger = MockLedger::new(overridden_config()?).revoke_url(test_utils::STAND_IN_URL);
    let state = ledger.state();

    let report = test_utils::revoked_peer_scenario()
        .run(&ledger)
        .expect("scenario must end in a refused query");

    assert!(!report.channel_transaction.is_empty());
    assert!(!report.instantiate_response.transaction_id.is_empty());
    assert!(report.rejection.0.contains("certificate has been revoked"));

    let (_, org2_peers) = report
        .org_peers
        .iter()
        .find(|(org, _)| org == test_utils::ORG2)
        .expect("report carries org2's peers");
    assert_eq!(org2_peers.len(), 1);
    assert_eq!(org2_peers[0].url, test_utils::STAND_IN_URL);

    // Exactly one query attempt; the refusal is not retried.
    assert_eq!(state.lock().unwrap().queries, 1);
    Ok(())
}

#[test]
fn overridden_topology_is_observed_by_provider() -> anyhow::Result<()> {
    test_utils::init_logging();

    let overridden = overridden_config()?;
    assert_eq!(
        overridden.organizations[test_utils::ORG2].peers,
        vec![test_utils::STAND_IN_PEER.to_string()]
    );
    let members = &overridden.channels[test_utils::CHANNEL_ID].peers;
    assert!(!members.contains_key(test_utils::REVOKED_PEER));
    let roles = members[test_utils::STAND_IN_PEER];
    assert!(roles.endorsing_peer);
    assert!(roles.chaincode_query);
    assert!(roles.ledger_query);
    assert!(!roles.event_source);

    let ledger = MockLedger::new(overridden);
    let peers = ledger.org_peers(test_utils::ORG2).expect("org2 peers resolve");
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].url, test_utils::STAND_IN_URL);
    Ok(())
}

#[test]
fn join_failure_aborts_the_scenario() -> anyhow::Result<()> {
    test_utils::init_logging();

    let ledger = MockLedger::new(overridden_config()?)
        .revoke_url(test_utils::STAND_IN_URL)
        .refuse_join(test_utils::ORG2);
    let state = ledger.state();

    let err = test_utils::revoked_peer_scenario()
        .run(&ledger)
        .expect_err("a refused join must abort the scenario");
    match err {
        ScenarioError::Setup {
            step: Step::JoinChannel(org),
            source,
        } => {
            assert_eq!(org, test_utils::ORG2);
            assert!(source.0.contains("connection refused"));
        }
        other => panic!("unexpected scenario outcome: {:?}", other),
    }

    // The final query was never attempted.
    assert_eq!(state.lock().unwrap().queries, 0);
    Ok(())
}

#[test]
fn accepted_query_fails_the_scenario() -> anyhow::Result<()> {
    test_utils::init_logging();

    // Nothing revoked: the query goes through and that is the failure.
    let ledger = MockLedger::new(overridden_config()?);
    match test_utils::revoked_peer_scenario()
        .run(&ledger)
        .expect_err("an accepted query fails the scenario")
    {
        ScenarioError::UnexpectedAcceptance { payload } => assert!(!payload.is_empty()),
        other => panic!("unexpected scenario outcome: {:?}", other),
    }
    Ok(())
}
