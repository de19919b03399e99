use std::sync::Mutex;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use claim::{assert_err, assert_matches};
use data::{find_network, DEFAULT_CHAIN_ID};
use library::{
    ballot::{Ballot, BallotError, GateFailure, SubmissionStatus, SubmitError, VoteSubmitter},
    config::CouncilConfig,
    feed::{FeedUpdate, GranteeFeed, SortingMethod},
    session::{AllocationQueryResponse, SessionState},
    types::{Council, FlowStateProfile, GdaPool},
};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;

const GRANTEES: usize = 25;
const MEMBER: &str = "0x1111111111111111111111111111111111111111";

fn grantee_address(n: usize) -> Address {
    Address::with_last_byte(n as u8 + 1)
}

fn council_json(grantees: usize) -> String {
    let grantees: Vec<_> = (0..grantees)
        .map(|n| json!({ "name": format!("profile-{}", n), "account": grantee_address(n) }))
        .collect();
    json!({
        "councilName": "Flow Council",
        "councilSymbol": "FLOW",
        "pool": "0x00000000000000000000000000000000000000b0",
        "maxAllocationsPerMember": "10",
        "councilMembers": [{ "account": MEMBER, "votingPower": "100" }],
        "grantees": grantees,
    })
    .to_string()
}

fn profiles_json(count: usize) -> String {
    let profiles: Vec<_> = (0..count)
        .map(|n| {
            json!({
                "id": format!("profile-{}", n),
                "metadata": { "title": format!("Grantee {:02}", n), "website": "https://example.org" },
            })
        })
        .collect();
    serde_json::Value::Array(profiles).to_string()
}

/// Grantee `n` holds `n + 1` units, total flow 2 600 wei/sec minus 100 adjustment.
fn pool_json(grantees: usize) -> String {
    let members: Vec<_> = (0..grantees)
        .map(|n| json!({ "account": { "id": grantee_address(n) }, "units": (n + 1).to_string() }))
        .collect();
    let total: usize = (1..=grantees).sum();
    json!({
        "id": "0x00000000000000000000000000000000000000b0",
        "flowRate": "2600",
        "adjustmentFlowRate": "100",
        "totalUnits": total.to_string(),
        "poolMembers": members,
    })
    .to_string()
}

fn loaded_session() -> anyhow::Result<SessionState> {
    let network = find_network(DEFAULT_CHAIN_ID);
    let mut session = SessionState::new(network.id);
    session.connect(Some(MEMBER.parse()?));

    let council: Council = serde_json::from_str(&council_json(GRANTEES))?;
    let profiles: Vec<FlowStateProfile> = serde_json::from_str(&profiles_json(GRANTEES))?;
    let pool: GdaPool = serde_json::from_str(&pool_json(GRANTEES))?;
    session.observe_council(Some(council));
    session.observe_profiles(Some(profiles));
    session.observe_pool(Some(pool));

    let current = AllocationQueryResponse::from_json_str(
        &json!({
            "councilMember": { "votingPower": "100" },
            "allocations": [{
                "grantees": [{ "account": grantee_address(0) }, { "account": grantee_address(1) }],
                "amounts": ["30", "20"],
            }],
        })
        .to_string(),
    )?
    .into_current_allocation()?;
    session.observe_current_allocation(Some(current));

    Ok(session)
}

struct RecordingSubmitter {
    result: Result<TxHash, SubmitError>,
    calls: Mutex<Vec<(Vec<Address>, Vec<U256>)>>,
}

#[async_trait]
impl VoteSubmitter for RecordingSubmitter {
    async fn submit_vote(
        &self,
        grantees: &[Address],
        amounts: &[U256],
    ) -> Result<TxHash, SubmitError> {
        self.calls
            .lock()
            .unwrap()
            .push((grantees.to_vec(), amounts.to_vec()));
        self.result.clone()
    }
}

#[test]
fn feed_scenario() -> anyhow::Result<()> {
    let config = CouncilConfig::from_json_str(r#"{"feed": {"batchSize": 10}}"#)?;
    let mut session = loaded_session()?;
    let mut feed = GranteeFeed::with_rng(&config.feed, StdRng::seed_from_u64(3));

    // Sentinel out of view, nothing revealed yet.
    assert_eq!(feed.update(&session, false), FeedUpdate::Refreshed);
    assert!(feed.grantees().is_empty());

    let mut revealed = Vec::new();
    while feed.has_next() {
        match feed.update(&session, true) {
            FeedUpdate::Revealed { new, .. } => revealed.push(new),
            other => anyhow::bail!("unexpected feed update {:?}", other),
        }
    }
    assert_eq!(revealed, vec![10, 10, 5]);
    assert_eq!(feed.grantees().len(), GRANTEES);

    // 2 500 wei/sec shared over 325 units.
    feed.set_sorting_method(SortingMethod::Popular);
    let top = &feed.grantees()[0];
    assert_eq!(top.title(), "Grantee 24");
    assert_eq!(top.units, 25);
    assert_eq!(top.flow_rate, U256::from(25u64 * 2500 / 325));

    // Flow doubles, visible cards follow without a new scan.
    let mut pool: GdaPool = serde_json::from_str(&pool_json(GRANTEES))?;
    pool.flow_rate = U256::from(5100u64);
    session.observe_pool(Some(pool));
    assert_eq!(feed.update(&session, true), FeedUpdate::Refreshed);
    assert_eq!(feed.grantees()[0].flow_rate, U256::from(25u64 * 5000 / 325));

    feed.set_sorting_method(SortingMethod::Alphabetical);
    assert_eq!(feed.grantees()[0].title(), "Grantee 00");
    assert_eq!(feed.grantees()[GRANTEES - 1].title(), "Grantee 24");
    Ok(())
}

#[tokio::test]
async fn ballot_scenario() -> anyhow::Result<()> {
    let config = CouncilConfig::default();
    let session = loaded_session()?;
    let mut ballot = Ballot::new(config.ballot.clone());

    ballot.open(&session);
    assert!(ballot.is_visible());
    assert_eq!(ballot.draft().len(), 2);
    assert_matches!(
        ballot.check_submission(&session),
        Err(GateFailure::Unchanged)
    );

    // Already voted for, the card button does nothing.
    assert!(!ballot.add_grantee(&session, grantee_address(1)));
    assert!(ballot.add_grantee(&session, grantee_address(2)));
    assert_eq!(ballot.draft().len(), 3);

    for _ in 0..5 {
        let action = ballot.step_amount(2, true).unwrap();
        ballot.dispatch(action);
    }
    let summary = ballot.summary(&session);
    assert_eq!(summary.total_votes, 100);
    assert!(!summary.over_voting_power());
    assert!(ballot.can_submit(&session));

    let submitter = RecordingSubmitter {
        result: Ok(TxHash::repeat_byte(0xaa)),
        calls: Mutex::new(Vec::new()),
    };
    let hash = ballot.submit(&session, &submitter).await?;
    assert_eq!(ballot.status(), &SubmissionStatus::Submitted(hash));
    {
        let calls = submitter.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].0,
            vec![grantee_address(0), grantee_address(1), grantee_address(2)]
        );
        assert_eq!(
            calls[0].1,
            vec![U256::from(30u64), U256::from(20u64), U256::from(50u64)]
        );
    }

    // Typed amount pushes the total past the voting power.
    let action = ballot.input_amount(2, "51").unwrap();
    ballot.dispatch(action);
    let err = ballot.submit(&session, &submitter).await.unwrap_err();
    assert_matches!(
        err,
        BallotError::SubmissionDisabled(GateFailure::OverVotingPower {
            total: 101,
            voting_power: 100
        })
    );
    assert_eq!(submitter.calls.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_submission_keeps_draft() -> anyhow::Result<()> {
    let session = loaded_session()?;
    let mut ballot = Ballot::new(CouncilConfig::default().ballot);
    ballot.open(&session);
    let action = ballot.input_amount(0, "").unwrap();
    ballot.dispatch(action);

    let submitter = RecordingSubmitter {
        result: Err(SubmitError::Reverted("execution reverted".into())),
        calls: Mutex::new(Vec::new()),
    };
    assert_err!(ballot.submit(&session, &submitter).await);
    assert!(ballot.status().error_message().is_some());
    assert_eq!(ballot.draft().len(), 2);
    assert_eq!(ballot.draft().allocation[0].amount, 0);

    // Zero amounts are not sent.
    assert_eq!(
        submitter.calls.lock().unwrap()[0].0,
        vec![grantee_address(1)]
    );

    ballot.dismiss_error();
    assert_eq!(ballot.status(), &SubmissionStatus::Idle);
    Ok(())
}
