use alloy_primitives::{Address, U256};
use thiserror::Error;

use super::reducer::DraftAllocation;
use crate::{
    types::{Allocation, CurrentAllocation},
    Votes,
};

/// Reason why the vote button stays disabled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateFailure {
    #[error("ballot is empty")]
    EmptyBallot,
    #[error("{total} votes allocated but only {voting_power} available")]
    OverVotingPower { total: u128, voting_power: Votes },
    #[error("{count} projects selected, at most {max} allowed")]
    TooManyAllocations { count: usize, max: usize },
    #[error("ballot does not differ from the current allocation")]
    Unchanged,
}

/// Numbers shown in the ballot header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BallotSummary {
    pub entries: usize,
    pub max_entries: usize,
    pub total_votes: u128,
    pub voting_power: Votes,
}

impl BallotSummary {
    pub fn over_entry_cap(&self) -> bool {
        self.entries > self.max_entries
    }

    pub fn over_voting_power(&self) -> bool {
        self.total_votes > self.voting_power as u128
    }
}

pub fn total_votes(allocation: &[Allocation]) -> u128 {
    allocation
        .iter()
        .fold(0u128, |sum, a| sum.saturating_add(a.amount as u128))
}

pub fn summarize(draft: &DraftAllocation, voting_power: Votes, max_entries: usize) -> BallotSummary {
    BallotSummary {
        entries: draft.len(),
        max_entries,
        total_votes: total_votes(&draft.allocation),
        voting_power,
    }
}

/// Checks whether `draft` may be submitted.
/// A missing current allocation compares as an empty one.
pub fn check_submission(
    draft: &DraftAllocation,
    current: Option<&CurrentAllocation>,
    voting_power: Votes,
    max_entries: usize,
) -> Result<(), GateFailure> {
    let summary = summarize(draft, voting_power, max_entries);

    if summary.over_voting_power() {
        return Err(GateFailure::OverVotingPower {
            total: summary.total_votes,
            voting_power,
        });
    }
    if summary.over_entry_cap() {
        return Err(GateFailure::TooManyAllocations {
            count: summary.entries,
            max: max_entries,
        });
    }
    let current = current.map(|c| c.allocation.as_slice()).unwrap_or(&[]);
    if draft.allocation.as_slice() == current {
        return Err(GateFailure::Unchanged);
    }
    if draft.is_empty() {
        return Err(GateFailure::EmptyBallot);
    }
    Ok(())
}

/// Arguments handed to the vote submitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteRequest {
    pub grantees: Vec<Address>,
    pub amounts: Vec<U256>,
}

impl VoteRequest {
    /// Zero amounts are dropped.
    pub fn from_allocation(allocation: &[Allocation]) -> Self {
        let (grantees, amounts) = allocation
            .iter()
            .filter(|a| a.amount != 0)
            .map(|a| (a.grantee, U256::from(a.amount)))
            .unzip();
        VoteRequest { grantees, amounts }
    }
}
