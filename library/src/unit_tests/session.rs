use alloy_primitives::{address, Address, U256};
use claim::{assert_err, assert_matches, assert_none, assert_ok};

use super::{alloc, council, grantee, loaded_session, member, CHAIN_ID};
use crate::{
    error::SessionError,
    session::{council_member_id, AllocationQueryResponse, SessionState},
    types::{Council, CurrentAllocation, GdaPool},
};

#[test]
fn voting_power_of_connected_account() {
    let mut session = SessionState::new(CHAIN_ID);
    assert_eq!(session.voting_power(), 0);

    session.connect(Some(member(1)));
    assert_eq!(session.voting_power(), 0);

    session.observe_council(Some(council(3, &[(member(1), 100), (member(2), 50)])));
    assert_eq!(session.voting_power(), 100);

    session.connect(Some(member(2)));
    assert_eq!(session.voting_power(), 50);

    session.connect(Some(member(9)));
    assert_eq!(session.voting_power(), 0);

    session.connect(None);
    assert_eq!(session.voting_power(), 0);
}

#[test]
fn account_switch_drops_allocation() {
    let mut session = loaded_session(3);
    session.observe_current_allocation(Some(CurrentAllocation::new(vec![alloc(0, 10)], 100)));

    // Same account keeps it.
    session.connect(Some(member(1)));
    assert!(session.current_allocation().is_some());

    session.connect(Some(member(2)));
    assert_none!(session.current_allocation());
    assert_eq!(session.account(), Some(&member(2)));
    assert_eq!(session.chain_id(), CHAIN_ID);
}

#[test]
fn grantee_title_lookup() {
    let mut session = loaded_session(3);
    assert_eq!(session.grantee_title(&grantee(2)), Some("Project 02"));
    assert_none!(session.grantee_title(&grantee(7)));

    // Roster knows the grantee, profile not loaded yet.
    session.observe_profiles(Some(super::profiles(2)));
    assert_none!(session.grantee_title(&grantee(2)));
    session.observe_profiles(None);
    assert_none!(session.grantee_title(&grantee(0)));
}

#[test]
fn member_id_format() {
    let council = address!("00000000000000000000000000000000000000c0");
    assert_eq!(
        council_member_id(&council, &member(1)),
        "0x00000000000000000000000000000000000000c0-0x0101010101010101010101010101010101010101"
    );
}

#[test]
fn latest_allocation_query() {
    let input = r#"{
        "councilMember": { "votingPower": "100" },
        "allocations": [{
            "grantees": [
                { "account": "0x0000000000000000000000000000000000000001" },
                { "account": "0x0000000000000000000000000000000000000002" }
            ],
            "amounts": ["30", "20"]
        }]
    }"#;

    let current = assert_ok!(AllocationQueryResponse::from_json_str(input))
        .into_current_allocation()
        .unwrap();
    assert_eq!(current.voting_power, 100);
    assert_eq!(current.allocation, vec![alloc(0, 30), alloc(1, 20)]);
    assert!(current.contains(&grantee(1)));
}

#[test]
fn member_without_allocations() {
    let input = r#"{ "councilMember": { "votingPower": 42 }, "allocations": [] }"#;
    let current = AllocationQueryResponse::from_json_str(input)
        .unwrap()
        .into_current_allocation()
        .unwrap();
    assert!(current.allocation.is_empty());
    assert_eq!(current.voting_power, 42);

    let input = r#"{ "councilMember": null }"#;
    let current = AllocationQueryResponse::from_json_str(input)
        .unwrap()
        .into_current_allocation()
        .unwrap();
    assert_eq!(current, CurrentAllocation::default());
}

#[test]
fn malformed_allocation_query() {
    let input = r#"{
        "councilMember": { "votingPower": "100" },
        "allocations": [{
            "grantees": [{ "account": "0x0000000000000000000000000000000000000001" }],
            "amounts": ["30", "20"]
        }]
    }"#;
    let err = AllocationQueryResponse::from_json_str(input)
        .unwrap()
        .into_current_allocation()
        .unwrap_err();
    assert_matches!(err, SessionError::AllocationShape { grantees: 1, amounts: 2 });

    let input = r#"{
        "councilMember": { "votingPower": "100" },
        "allocations": [{
            "grantees": [{ "account": "0x0000000000000000000000000000000000000001" }],
            "amounts": ["1.5"]
        }]
    }"#;
    let err = AllocationQueryResponse::from_json_str(input)
        .unwrap()
        .into_current_allocation()
        .unwrap_err();
    assert_matches!(err, SessionError::AmountOverflow(_));

    assert_err!(AllocationQueryResponse::from_json_str("{ \"allocations\": 5 }"));
}

#[test]
fn council_snapshot_from_subgraph() {
    let input = r#"{
        "councilName": "Flow Council",
        "councilSymbol": "FLOW",
        "pool": "0x00000000000000000000000000000000000000b0",
        "maxAllocationsPerMember": "10",
        "councilMembers": [
            { "account": "0x0101010101010101010101010101010101010101", "votingPower": "100" }
        ],
        "grantees": [
            { "name": "profile-0", "account": "0x0000000000000000000000000000000000000001" }
        ]
    }"#;

    let council: Council = serde_json::from_str(input).unwrap();
    assert_eq!(council.max_allocations_per_member, 10);
    assert_eq!(council.voting_power(&member(1)), 100);
    assert!(council.council_members[0].enabled);
    assert_eq!(council.grantee_by_account(&grantee(0)).unwrap().name, "profile-0");
    assert_none!(council.grantee_by_account(&grantee(5)));
}

#[test]
fn pool_snapshot_from_subgraph() {
    let input = r#"{
        "id": "0x00000000000000000000000000000000000000b0",
        "flowRate": "1000",
        "adjustmentFlowRate": "100",
        "totalUnits": "900",
        "poolMembers": [
            { "account": { "id": "0x0000000000000000000000000000000000000001" }, "units": "90" }
        ]
    }"#;

    let pool: GdaPool = serde_json::from_str(input).unwrap();
    assert_eq!(pool.adjusted_flow_rate(), U256::from(900u64));
    assert_eq!(pool.member_units(&grantee(0)), 90);
    assert_eq!(pool.member_units(&Address::ZERO), 0);
}

#[test]
fn pool_distribution_stats() {
    let input = r#"{
        "id": "0x00000000000000000000000000000000000000b0",
        "flowRate": "1000",
        "totalUnits": "900",
        "totalAmountFlowedDistributedUntilUpdatedAt": "5000000",
        "updatedAtTimestamp": "1700000000"
    }"#;

    let pool: GdaPool = serde_json::from_str(input).unwrap();
    assert_eq!(pool.monthly_distribution(), U256::from(1000u64 * 2_628_000));
    assert_eq!(pool.distributed_at(1_700_000_000), U256::from(5_000_000u64));
    assert_eq!(pool.distributed_at(1_700_000_060), U256::from(5_060_000u64));
    // Clock behind the indexer.
    assert_eq!(pool.distributed_at(1_699_999_000), U256::from(5_000_000u64));
}
