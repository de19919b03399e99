#![allow(unused, dead_code)]
#![cfg(test)]

use alloy_primitives::{Address, U256};

use crate::{
    session::SessionState,
    types::{
        Allocation, Council, CouncilGrantee, CouncilMember, CurrentAllocation, FlowStateProfile,
        GdaPool, PoolAccount, PoolMember, ProjectMetadata,
    },
    Units, Votes,
};

mod ballot;
mod feed;
mod session;

const CHAIN_ID: u64 = 11_155_420;

fn council_address() -> Address {
    Address::repeat_byte(0xc0)
}

fn pool_address() -> Address {
    Address::repeat_byte(0xb0)
}

fn member(n: u8) -> Address {
    Address::repeat_byte(n)
}

fn grantee(n: usize) -> Address {
    Address::with_last_byte(n as u8 + 1)
}

fn profile_id(n: usize) -> String {
    format!("profile-{}", n)
}

fn alloc(n: usize, amount: Votes) -> Allocation {
    Allocation::new(grantee(n), amount)
}

fn council(grantees: usize, members: &[(Address, Votes)]) -> Council {
    Council {
        council_name: "Flow Council".into(),
        council_symbol: "FLOW".into(),
        pool: pool_address(),
        council_members: members
            .iter()
            .map(|(account, voting_power)| CouncilMember {
                account: *account,
                voting_power: *voting_power,
                enabled: true,
            })
            .collect(),
        grantees: (0..grantees)
            .map(|n| CouncilGrantee {
                name: profile_id(n),
                account: grantee(n),
                enabled: true,
            })
            .collect(),
        max_allocations_per_member: 10,
    }
}

fn profile(n: usize, title: &str) -> FlowStateProfile {
    FlowStateProfile {
        id: profile_id(n),
        metadata: ProjectMetadata {
            title: title.into(),
            description: format!("{} description", title),
            ..Default::default()
        },
    }
}

fn profiles(count: usize) -> Vec<FlowStateProfile> {
    (0..count)
        .map(|n| profile(n, &format!("Project {:02}", n)))
        .collect()
}

fn pool(flow_rate: u64, adjustment: u64, total_units: Units, members: &[(Address, Units)]) -> GdaPool {
    GdaPool {
        id: pool_address(),
        flow_rate: U256::from(flow_rate),
        adjustment_flow_rate: U256::from(adjustment),
        total_units,
        total_amount_flowed_distributed_until_updated_at: U256::ZERO,
        updated_at_timestamp: 0,
        pool_members: members
            .iter()
            .map(|(account, units)| PoolMember {
                account: PoolAccount { id: *account },
                units: *units,
            })
            .collect(),
    }
}

/// Pool where grantee `n` holds `n + 1` units.
fn pool_for(grantees: usize) -> GdaPool {
    let members: Vec<(Address, Units)> = (0..grantees).map(|n| (grantee(n), n as Units + 1)).collect();
    let total = members.iter().map(|(_, u)| *u).sum();
    pool(1_000_000, 0, total, &members)
}

/// Session of `member(1)` holding 100 votes, with a fully loaded roster.
fn loaded_session(grantees: usize) -> SessionState {
    let mut session = SessionState::new(CHAIN_ID);
    session.connect(Some(member(1)));
    session.observe_council(Some(council(grantees, &[(member(1), 100), (member(2), 50)])));
    session.observe_profiles(Some(profiles(grantees)));
    session.observe_pool(Some(pool_for(grantees)));
    session
}
