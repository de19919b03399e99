use std::sync::Mutex;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use claim::{assert_matches, assert_none, assert_ok};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{alloc, grantee, loaded_session, member};
use crate::{
    ballot::{
        reduce, Ballot, BallotAction, BallotError, DraftAllocation, GateFailure,
        SubmissionStatus, SubmitError, VoteRequest, VoteSubmitter,
    },
    config::BallotSettings,
    session::SessionState,
    types::{Allocation, CurrentAllocation},
};

fn draft(entries: Vec<Allocation>) -> DraftAllocation {
    DraftAllocation {
        visible: true,
        allocation: entries,
    }
}

fn current(entries: Vec<Allocation>) -> CurrentAllocation {
    CurrentAllocation::new(entries, 100)
}

fn assert_unique(draft: &DraftAllocation) {
    for (i, a) in draft.allocation.iter().enumerate() {
        assert!(
            draft.allocation[i + 1..].iter().all(|b| b.grantee != a.grantee),
            "duplicate grantee {}",
            a.grantee
        );
    }
}

#[test]
fn seed_empty_draft() {
    let state = DraftAllocation::new();
    let next = reduce(
        &state,
        BallotAction::Seed {
            current: current(vec![alloc(0, 10), alloc(1, 20)]),
        },
    );
    assert!(next.visible);
    assert_eq!(next.allocation, vec![alloc(0, 10), alloc(1, 20)]);
    // Input state is untouched.
    assert_eq!(state, DraftAllocation::new());
}

#[test]
fn seed_keeps_non_empty_draft() {
    let mut state = draft(vec![alloc(3, 5)]);
    state.visible = false;
    let next = reduce(
        &state,
        BallotAction::Seed {
            current: current(vec![alloc(0, 10)]),
        },
    );
    assert!(next.visible);
    assert_eq!(next.allocation, vec![alloc(3, 5)]);
}

#[test]
fn add_seeds_empty_draft_then_appends() {
    let next = reduce(
        &DraftAllocation::new(),
        BallotAction::Add {
            allocation: alloc(2, 0),
            current: Some(current(vec![alloc(0, 10), alloc(1, 20)])),
        },
    );
    assert_eq!(next.allocation, vec![alloc(0, 10), alloc(1, 20), alloc(2, 0)]);
    assert!(!next.visible);
}

#[test]
fn add_ignores_current_for_non_empty_draft() {
    let next = reduce(
        &draft(vec![alloc(5, 1)]),
        BallotAction::Add {
            allocation: alloc(2, 0),
            current: Some(current(vec![alloc(0, 10)])),
        },
    );
    assert_eq!(next.allocation, vec![alloc(5, 1), alloc(2, 0)]);

    let next = reduce(
        &DraftAllocation::new(),
        BallotAction::Add {
            allocation: alloc(2, 7),
            current: None,
        },
    );
    assert_eq!(next.allocation, vec![alloc(2, 7)]);
}

#[test]
fn update_replaces_in_place() {
    let state = draft(vec![alloc(0, 1), alloc(1, 2), alloc(2, 3)]);
    let next = reduce(&state, BallotAction::Update(alloc(1, 40)));
    assert_eq!(next.allocation, vec![alloc(0, 1), alloc(1, 40), alloc(2, 3)]);

    let next = reduce(&state, BallotAction::Update(alloc(9, 40)));
    assert_eq!(next, state);
}

#[test]
fn update_is_idempotent() {
    let state = draft(vec![alloc(0, 1), alloc(1, 2)]);
    let once = reduce(&state, BallotAction::Update(alloc(0, 15)));
    let twice = reduce(&once, BallotAction::Update(alloc(0, 15)));
    assert_eq!(once, twice);
}

#[test]
fn delete_keeps_order() {
    let state = draft(vec![alloc(0, 1), alloc(1, 2), alloc(2, 3), alloc(3, 4)]);
    let next = reduce(&state, BallotAction::Delete { grantee: grantee(1) });
    assert_eq!(next.allocation, vec![alloc(0, 1), alloc(2, 3), alloc(3, 4)]);
    let next = reduce(&next, BallotAction::Delete { grantee: grantee(7) });
    assert_eq!(next.len(), 3);
}

#[test]
fn show_and_hide() {
    let state = draft(vec![alloc(0, 1)]);
    let hidden = reduce(&state, BallotAction::HideBallot);
    assert!(!hidden.visible);
    assert_eq!(hidden.allocation, state.allocation);
    let shown = reduce(&hidden, BallotAction::ShowBallot);
    assert!(shown.visible);
}

#[test]
fn update_and_delete_never_duplicate() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = draft((0..6).map(|n| alloc(n, 10)).collect());

    for _ in 0..500 {
        let n = rng.gen_range(0..8);
        let action = if rng.gen_bool(0.7) {
            BallotAction::Update(alloc(n, rng.gen_range(0..100)))
        } else {
            BallotAction::Delete { grantee: grantee(n) }
        };
        state = reduce(&state, action);
        assert_unique(&state);
    }
}

#[test]
fn dispatch_json_actions() {
    let mut ballot = Ballot::default();
    let g0 = format!("{:#x}", grantee(0));
    let g1 = format!("{:#x}", grantee(1));

    let seed = format!(
        r#"{{"type": "add", "currentAllocation": {{"allocation": [{{"grantee": "{}", "amount": 10}}], "votingPower": 100}}}}"#,
        g0
    );
    assert_ok!(ballot.dispatch_json(&seed));
    assert!(ballot.is_visible());
    assert_eq!(ballot.draft().allocation, vec![alloc(0, 10)]);

    let add = format!(r#"{{"type": "add", "allocation": {{"grantee": "{}", "amount": 5}}}}"#, g1);
    assert_ok!(ballot.dispatch_json(&add));
    assert_ok!(ballot.dispatch_json(r#"{"type": "hide-ballot"}"#));
    assert!(!ballot.is_visible());
    assert_eq!(ballot.draft().allocation, vec![alloc(0, 10), alloc(1, 5)]);

    let err = ballot.dispatch_json(r#"{"type": "reset"}"#).unwrap_err();
    assert!(matches!(err, BallotError::UnknownAction(ref kind) if kind == "reset"));
    assert!(err.is_fatal());

    // Known actions without a payload leave the draft as is.
    assert_ok!(ballot.dispatch_json(r#"{"type": "add"}"#));
    assert_ok!(ballot.dispatch_json(r#"{"type": "update"}"#));
    assert_ok!(ballot.dispatch_json(r#"{"type": "delete"}"#));
    assert_eq!(ballot.draft().allocation, vec![alloc(0, 10), alloc(1, 5)]);
    assert!(!ballot.is_visible());
    assert_none!(BallotAction::from_json_str(r#"{"type": "delete"}"#).unwrap());

    let err = ballot.dispatch_json("not json").unwrap_err();
    assert_matches!(err, BallotError::Malformed(_));

    assert_eq!(ballot.draft().len(), 2);
}

#[test]
fn voting_power_gate() {
    let session = loaded_session(5);
    let mut ballot = Ballot::default();
    ballot.dispatch(BallotAction::Add {
        allocation: alloc(0, 60),
        current: None,
    });
    ballot.dispatch(BallotAction::Add {
        allocation: alloc(1, 41),
        current: None,
    });

    assert_eq!(ballot.voting_power(&session), 100);
    assert!(ballot.summary(&session).over_voting_power());
    assert_eq!(
        ballot.check_submission(&session),
        Err(GateFailure::OverVotingPower {
            total: 101,
            voting_power: 100
        })
    );
    assert!(!ballot.can_submit(&session));

    ballot.dispatch(BallotAction::Update(alloc(1, 40)));
    assert!(ballot.can_submit(&session));
}

#[test]
fn entry_cap_gate() {
    let session = loaded_session(12);
    let mut ballot = Ballot::default();
    for n in 0..11 {
        ballot.dispatch(BallotAction::Add {
            allocation: alloc(n, 1),
            current: None,
        });
    }
    let summary = ballot.summary(&session);
    assert!(summary.over_entry_cap());
    assert!(!summary.over_voting_power());
    assert_eq!(
        ballot.check_submission(&session),
        Err(GateFailure::TooManyAllocations { count: 11, max: 10 })
    );

    ballot.dispatch(BallotAction::Delete { grantee: grantee(10) });
    assert!(ballot.can_submit(&session));
}

#[test]
fn council_cap_overrides_settings() {
    let mut session = loaded_session(12);
    let mut council = session.council().cloned().unwrap();
    council.max_allocations_per_member = 3;
    session.observe_council(Some(council.clone()));

    let mut ballot = Ballot::default();
    for n in 0..4 {
        ballot.dispatch(BallotAction::Add {
            allocation: alloc(n, 10),
            current: None,
        });
    }
    assert_eq!(ballot.max_allocations(&session), 3);
    assert!(ballot.summary(&session).over_entry_cap());
    assert_eq!(
        ballot.check_submission(&session),
        Err(GateFailure::TooManyAllocations { count: 4, max: 3 })
    );

    // Councils without a cap fall back to the configured one.
    council.max_allocations_per_member = 0;
    session.observe_council(Some(council));
    assert_eq!(ballot.max_allocations(&session), 10);
    assert!(ballot.can_submit(&session));
}

#[test]
fn unchanged_gate() {
    let mut session = loaded_session(5);
    session.observe_current_allocation(Some(current(vec![alloc(0, 30), alloc(1, 20)])));

    let mut ballot = Ballot::default();
    ballot.open(&session);
    assert!(ballot.is_visible());
    assert_eq!(ballot.check_submission(&session), Err(GateFailure::Unchanged));

    ballot.dispatch(BallotAction::Update(alloc(1, 25)));
    assert!(ballot.can_submit(&session));

    // Back to the exact same values.
    ballot.dispatch(BallotAction::Update(alloc(1, 20)));
    assert!(!ballot.can_submit(&session));
}

#[test]
fn empty_ballot_gate() {
    let session = loaded_session(5);
    let mut ballot = Ballot::default();
    ballot.open(&session);
    assert!(ballot.is_visible());
    assert_matches!(ballot.check_submission(&session), Err(_));
    assert!(!ballot.can_submit(&session));
}

#[test]
fn non_member_has_no_voting_power() {
    let mut session = loaded_session(3);
    session.connect(Some(member(9)));
    let mut ballot = Ballot::default();
    ballot.dispatch(BallotAction::Add {
        allocation: alloc(0, 1),
        current: None,
    });
    assert_eq!(ballot.voting_power(&session), 0);
    assert!(!ballot.can_submit(&session));
}

#[test]
fn add_grantee_once() {
    let mut session = loaded_session(5);
    session.observe_current_allocation(Some(current(vec![alloc(0, 30)])));
    let mut ballot = Ballot::default();

    assert!(!ballot.add_grantee(&session, grantee(0)));
    assert!(ballot.add_grantee(&session, grantee(1)));
    assert!(!ballot.add_grantee(&session, grantee(1)));
    assert!(ballot.is_visible());
    assert_eq!(ballot.draft().allocation, vec![alloc(0, 30), alloc(1, 0)]);
}

#[test]
fn amount_editing() {
    let settings = BallotSettings {
        max_allocations_per_member: 10,
        amount_step: 10,
    };
    let mut ballot = Ballot::new(settings);
    ballot.dispatch(BallotAction::Add {
        allocation: alloc(0, 5),
        current: None,
    });

    assert_eq!(
        ballot.step_amount(0, true),
        Some(BallotAction::Update(alloc(0, 15)))
    );
    assert_eq!(
        ballot.step_amount(0, false),
        Some(BallotAction::Update(alloc(0, 0)))
    );
    assert_none!(ballot.step_amount(3, true));

    assert_eq!(
        ballot.input_amount(0, "42"),
        Some(BallotAction::Update(alloc(0, 42)))
    );
    assert_eq!(
        ballot.input_amount(0, ""),
        Some(BallotAction::Update(alloc(0, 0)))
    );
    assert_none!(ballot.input_amount(0, "4x"));
    assert_none!(ballot.input_amount(0, "-3"));
}

#[test]
fn vote_request_drops_zero_amounts() {
    let request = VoteRequest::from_allocation(&[alloc(0, 10), alloc(1, 0), alloc(2, 25)]);
    assert_eq!(request.grantees, vec![grantee(0), grantee(2)]);
    assert_eq!(request.amounts, vec![U256::from(10u64), U256::from(25u64)]);
}

struct MockSubmitter {
    result: Result<TxHash, SubmitError>,
    calls: Mutex<Vec<(Vec<Address>, Vec<U256>)>>,
}

impl MockSubmitter {
    fn new(result: Result<TxHash, SubmitError>) -> Self {
        MockSubmitter {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VoteSubmitter for MockSubmitter {
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

fn ballot_with_votes() -> Ballot {
    let mut ballot = Ballot::default();
    ballot.dispatch(BallotAction::Add {
        allocation: alloc(0, 60),
        current: None,
    });
    ballot.dispatch(BallotAction::Add {
        allocation: alloc(1, 0),
        current: None,
    });
    ballot
}

#[tokio::test]
async fn submit_success() {
    let session = loaded_session(3);
    let mut ballot = ballot_with_votes();
    let hash = TxHash::repeat_byte(0x11);
    let submitter = MockSubmitter::new(Ok(hash));

    let result = ballot.submit(&session, &submitter).await;
    assert_eq!(result.unwrap(), hash);
    assert_eq!(ballot.status(), &SubmissionStatus::Submitted(hash));

    let calls = submitter.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, vec![grantee(0)]);
    assert_eq!(calls[0].1, vec![U256::from(60u64)]);
}

#[tokio::test]
async fn submit_failure_keeps_draft() {
    let session = loaded_session(3);
    let mut ballot = ballot_with_votes();
    let before = ballot.draft().clone();
    let failing = MockSubmitter::new(Err(SubmitError::Reverted("not a council member".into())));

    let err = ballot.submit(&session, &failing).await.unwrap_err();
    assert_matches!(err, BallotError::Submit(SubmitError::Reverted(_)));
    assert!(!err.is_fatal());
    assert_eq!(ballot.draft(), &before);
    assert_eq!(
        ballot.status().error_message(),
        Some("transaction reverted: not a council member")
    );
    assert!(ballot.can_submit(&session));

    ballot.dismiss_error();
    assert_eq!(ballot.status(), &SubmissionStatus::Idle);

    let hash = TxHash::repeat_byte(0x22);
    let result = ballot.submit(&session, &MockSubmitter::new(Ok(hash))).await;
    assert_eq!(result.unwrap(), hash);
}

#[test]
fn pending_submission_blocks_resubmit() {
    let session = loaded_session(3);
    let mut ballot = ballot_with_votes();

    let request = ballot.begin_submission(&session).unwrap();
    assert_eq!(request.grantees, vec![grantee(0)]);
    assert!(ballot.status().is_pending());
    assert!(!ballot.can_submit(&session));
    assert_matches!(
        ballot.begin_submission(&session),
        Err(BallotError::SubmissionPending)
    );

    assert_matches!(
        ballot.finish_submission(Err(SubmitError::Rejected)),
        Err(BallotError::Submit(SubmitError::Rejected))
    );
    assert!(!ballot.status().is_pending());
    assert!(ballot.can_submit(&session));
}

#[test]
fn abandoned_submission_can_be_reset() {
    let session = loaded_session(3);
    let mut ballot = ballot_with_votes();

    ballot.begin_submission(&session).unwrap();
    // Dismiss only clears failures.
    ballot.dismiss_error();
    assert!(ballot.status().is_pending());

    ballot.reset_status();
    assert_eq!(ballot.status(), &SubmissionStatus::Idle);
    assert!(ballot.can_submit(&session));
}

#[tokio::test]
async fn disabled_submission_never_reaches_submitter() {
    let session = SessionState::new(super::CHAIN_ID);
    let mut ballot = ballot_with_votes();
    let submitter = MockSubmitter::new(Ok(TxHash::ZERO));

    let err = ballot.submit(&session, &submitter).await.unwrap_err();
    assert_matches!(
        err,
        BallotError::SubmissionDisabled(GateFailure::OverVotingPower { .. })
    );
    assert!(submitter.calls.lock().unwrap().is_empty());
    assert_eq!(ballot.status(), &SubmissionStatus::Idle);
}
