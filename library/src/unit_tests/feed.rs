use alloy_primitives::U256;
use claim::assert_matches;
use rand::{rngs::StdRng, SeedableRng};

use super::{council, grantee, loaded_session, member, pool, profile, profiles, CHAIN_ID};
use crate::{
    config::FeedSettings,
    feed::{member_flow_rate, FeedUpdate, Grantee, GranteeFeed, SortingMethod},
    session::SessionState,
    GranteeKey,
};

fn feed(batch_size: usize) -> GranteeFeed<StdRng> {
    GranteeFeed::with_rng(&FeedSettings { batch_size }, StdRng::seed_from_u64(42))
}

fn keys(grantees: &[Grantee]) -> Vec<GranteeKey> {
    grantees.iter().map(|g| g.key()).collect()
}

fn titles(grantees: &[Grantee]) -> Vec<&str> {
    grantees.iter().map(|g| g.title()).collect()
}

fn assert_no_duplicates(grantees: &[Grantee]) {
    let mut keys = keys(grantees);
    let len = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), len, "duplicate grantees in feed");
}

#[test]
fn flow_rate_is_pro_rata() {
    let pool = pool(1000, 100, 900, &[(grantee(0), 90)]);
    assert_eq!(pool.adjusted_flow_rate(), U256::from(900u64));
    assert_eq!(member_flow_rate(&pool, 90), U256::from(90u64));
    assert_eq!(member_flow_rate(&pool, 0), U256::ZERO);

    // Truncating division.
    let pool = super::pool(1000, 0, 3, &[]);
    assert_eq!(member_flow_rate(&pool, 1), U256::from(333u64));

    let empty = super::pool(1000, 0, 0, &[]);
    assert_eq!(member_flow_rate(&empty, 10), U256::ZERO);
}

#[test]
fn grantee_flow_rate_from_pool_members() {
    let mut session = loaded_session(1);
    session.observe_pool(Some(pool(1000, 100, 900, &[(grantee(0), 90)])));
    let mut feed = feed(20);
    feed.update(&session, true);

    let revealed = &feed.grantees()[0];
    assert_eq!(revealed.units, 90);
    assert_eq!(revealed.flow_rate, U256::from(90u64));
    assert_eq!(revealed.monthly_flow(), U256::from(90u64 * 2_628_000));
}

#[test]
fn pagination_reveals_batches() {
    let session = loaded_session(45);
    let mut feed = feed(20);

    let mut revealed = Vec::new();
    for _ in 0..3 {
        match feed.update(&session, true) {
            FeedUpdate::Revealed { new, reset, .. } => {
                assert!(!reset);
                revealed.push(new);
            }
            other => panic!("unexpected update {:?}", other),
        }
    }

    assert_eq!(revealed, vec![20, 20, 5]);
    assert!(!feed.has_next());
    assert_eq!(feed.skip(), 45);
    assert_eq!(feed.grantees().len(), 45);
    assert_no_duplicates(feed.grantees());

    // Exhausted roster only refreshes.
    assert_eq!(feed.update(&session, true), FeedUpdate::Refreshed);
    assert_eq!(feed.grantees().len(), 45);
}

#[test]
fn out_of_view_reveals_nothing() {
    let session = loaded_session(45);
    let mut feed = feed(20);
    assert_eq!(feed.update(&session, false), FeedUpdate::Refreshed);
    assert!(feed.grantees().is_empty());
    assert!(feed.has_next());
}

#[test]
fn missing_data_defers() {
    let mut session = SessionState::new(CHAIN_ID);
    session.observe_council(Some(council(5, &[])));
    session.observe_profiles(Some(profiles(5)));
    let mut feed = feed(20);

    assert_eq!(feed.update(&session, true), FeedUpdate::Deferred);
    assert!(feed.has_next());
    assert_eq!(feed.skip(), 0);
    assert!(feed.grantees().is_empty());
}

#[test]
fn missing_profile_waits_for_data() {
    let mut session = loaded_session(10);
    // Profiles 0..4 known, 4.. not yet.
    session.observe_profiles(Some(profiles(4)));
    let mut feed = feed(20);

    assert_matches!(feed.update(&session, true), FeedUpdate::Revealed { new: 4, .. });
    assert_eq!(feed.skip(), 4);
    assert!(feed.has_next());
    assert_eq!(feed.batch(), 1);

    session.observe_profiles(Some(profiles(10)));
    assert_matches!(feed.update(&session, true), FeedUpdate::Revealed { new: 6, .. });
    assert_eq!(feed.skip(), 10);
    assert!(!feed.has_next());
    assert_no_duplicates(feed.grantees());
}

#[test]
fn batch_filled_across_scans_advances() {
    let mut session = loaded_session(45);
    session.observe_profiles(Some(profiles(4)));
    let mut feed = feed(20);

    assert_matches!(feed.update(&session, true), FeedUpdate::Revealed { new: 4, .. });
    session.observe_profiles(Some(profiles(45)));
    assert_matches!(feed.update(&session, true), FeedUpdate::Revealed { new: 16, .. });
    assert_eq!(feed.skip(), 20);
    assert_eq!(feed.batch(), 2);

    for _ in 0..10 {
        if !feed.has_next() {
            break;
        }
        feed.update(&session, true);
    }
    assert!(!feed.has_next());
    assert_eq!(feed.grantees().len(), 45);
    assert_no_duplicates(feed.grantees());
}

#[test]
fn pool_update_refreshes_visible() {
    let mut session = loaded_session(3);
    let mut feed = feed(20);
    feed.update(&session, true);
    assert_eq!(feed.grantees().len(), 3);

    session.observe_pool(Some(pool(
        6000,
        0,
        6,
        &[(grantee(0), 1), (grantee(1), 2), (grantee(2), 3)],
    )));
    assert_eq!(feed.update(&session, false), FeedUpdate::Refreshed);

    for g in feed.grantees() {
        assert_eq!(g.flow_rate, U256::from(1000u64) * U256::from(g.units));
    }

    // Member left the pool.
    session.observe_pool(Some(pool(6000, 0, 5, &[(grantee(1), 2), (grantee(2), 3)])));
    feed.update(&session, false);
    let left = feed
        .grantees()
        .iter()
        .find(|g| g.address == grantee(0))
        .unwrap();
    assert_eq!(left.units, 0);
    assert_eq!(left.flow_rate, U256::ZERO);
}

#[test]
fn roster_growth_resets_pagination() {
    let mut session = loaded_session(5);
    let mut feed = feed(20);
    feed.set_sorting_method(SortingMethod::Alphabetical);
    feed.update(&session, true);
    assert!(!feed.has_next());
    assert_eq!(feed.grantees().len(), 5);

    // A new grantee got approved.
    session.observe_council(Some(council(6, &[(member(1), 100)])));
    session.observe_profiles(Some(profiles(6)));

    assert_eq!(
        feed.update(&session, true),
        FeedUpdate::Revealed {
            scanned: 6,
            new: 1,
            reset: true
        }
    );
    assert!(!feed.has_next());
    assert_eq!(feed.skip(), 6);
    assert_eq!(feed.grantees().len(), 6);
    assert_no_duplicates(feed.grantees());
    assert_eq!(feed.grantees()[5].title(), "Project 05");
}

#[test]
fn reset_while_out_of_view_applies_on_next_scan() {
    let mut session = loaded_session(2);
    let mut feed = feed(20);
    feed.update(&session, true);

    session.observe_council(Some(council(3, &[])));
    session.observe_profiles(Some(profiles(3)));
    assert_eq!(feed.update(&session, false), FeedUpdate::Refreshed);
    assert!(feed.has_next());
    assert_eq!(feed.skip(), 0);

    assert_matches!(
        feed.update(&session, true),
        FeedUpdate::Revealed {
            new: 1,
            reset: true,
            ..
        }
    );
    assert_eq!(feed.grantees().len(), 3);
}

#[test]
fn empty_roster_then_growth() {
    let mut session = loaded_session(0);
    let mut feed = feed(20);
    assert_matches!(feed.update(&session, true), FeedUpdate::Revealed { new: 0, .. });
    assert!(!feed.has_next());

    session.observe_council(Some(council(2, &[])));
    session.observe_profiles(Some(profiles(2)));
    assert_matches!(feed.update(&session, true), FeedUpdate::Revealed { new: 2, .. });
}

#[test]
fn random_merge_keeps_previous_order() {
    let session = loaded_session(45);
    let mut feed = feed(20);
    assert_eq!(feed.sorting_method(), SortingMethod::Random);

    feed.update(&session, true);
    let first = keys(feed.grantees());
    feed.update(&session, true);
    let second = keys(feed.grantees());
    assert_eq!(&second[..20], first.as_slice());
    feed.update(&session, true);
    let third = keys(feed.grantees());
    assert_eq!(&third[..40], second.as_slice());
    assert_no_duplicates(feed.grantees());
}

#[test]
fn alphabetical_merge_sorts_everything() {
    let session = loaded_session(45);
    let mut feed = feed(20);
    feed.set_sorting_method(SortingMethod::Alphabetical);
    feed.update(&session, true);
    feed.update(&session, true);

    let titles = titles(feed.grantees());
    let mut sorted = titles.clone();
    sorted.sort();
    assert_eq!(titles, sorted);
    assert_eq!(titles.len(), 40);
}

#[test]
fn sort_switch_to_alphabetical() {
    let mut session = loaded_session(2);
    session.observe_profiles(Some(vec![profile(0, "Zeta"), profile(1, "Alpha")]));
    let mut feed = feed(20);
    feed.update(&session, true);
    assert_eq!(feed.grantees().len(), 2);

    feed.set_sorting_method(SortingMethod::Alphabetical);
    assert_eq!(titles(feed.grantees()), vec!["Alpha", "Zeta"]);
}

#[test]
fn popular_sorts_by_units_desc() {
    let session = loaded_session(10);
    let mut feed = feed(20);
    feed.update(&session, true);
    feed.set_sorting_method(SortingMethod::Popular);

    let units: Vec<u128> = feed.grantees().iter().map(|g| g.units).collect();
    assert_eq!(units, (1..=10).rev().collect::<Vec<u128>>());
}

#[test]
fn switching_back_to_random_reshuffles() {
    let session = loaded_session(30);
    let mut feed = feed(20);
    feed.update(&session, true);
    feed.update(&session, true);
    let mut before = keys(feed.grantees());

    feed.set_sorting_method(SortingMethod::Alphabetical);
    let alphabetical = keys(feed.grantees());
    feed.set_sorting_method(SortingMethod::Random);
    let mut after = keys(feed.grantees());
    assert_eq!(feed.sorting_method(), SortingMethod::Random);

    // Reshuffled, neither the earlier random order nor the sorted one.
    assert_ne!(after, before);
    assert_ne!(after, alphabetical);

    before.sort();
    after.sort();
    assert_eq!(before, after);
}
