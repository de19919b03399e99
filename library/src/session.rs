//! Latest upstream snapshots of one front-end session.
//!
//! Pollers replace snapshots through the `observe_*` methods; the ballot and
//! the grantee feed only read them. `None` means "not loaded yet".

use alloy_primitives::Address;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::SessionError,
    types::{wire::de_u64, Allocation, Council, CurrentAllocation, FlowStateProfile, GdaPool},
    ChainId, Votes,
};

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    chain_id: ChainId,
    account: Option<Address>,
    council: Option<Council>,
    profiles: Option<Vec<FlowStateProfile>>,
    pool: Option<GdaPool>,
    current_allocation: Option<CurrentAllocation>,
}

impl SessionState {
    pub fn new(chain_id: ChainId) -> Self {
        SessionState {
            chain_id,
            ..Default::default()
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn council(&self) -> Option<&Council> {
        self.council.as_ref()
    }

    pub fn profiles(&self) -> Option<&[FlowStateProfile]> {
        self.profiles.as_deref()
    }

    pub fn pool(&self) -> Option<&GdaPool> {
        self.pool.as_ref()
    }

    pub fn current_allocation(&self) -> Option<&CurrentAllocation> {
        self.current_allocation.as_ref()
    }

    /// Switching accounts drops the allocation of the previous one.
    pub fn connect(&mut self, account: Option<Address>) {
        if self.account != account {
            debug!(?account, "account changed");
            self.account = account;
            self.current_allocation = None;
        }
    }

    pub fn observe_council(&mut self, council: Option<Council>) {
        debug!(
            grantees = council.as_ref().map(|c| c.grantees.len()),
            "council snapshot"
        );
        self.council = council;
    }

    pub fn observe_profiles(&mut self, profiles: Option<Vec<FlowStateProfile>>) {
        debug!(profiles = profiles.as_ref().map(|p| p.len()), "profiles snapshot");
        self.profiles = profiles;
    }

    pub fn observe_pool(&mut self, pool: Option<GdaPool>) {
        debug!(
            flow_rate = pool.as_ref().map(|p| p.flow_rate.to_string()),
            "pool snapshot"
        );
        self.pool = pool;
    }

    pub fn observe_current_allocation(&mut self, current: Option<CurrentAllocation>) {
        self.current_allocation = current;
    }

    /// Project title shown for a grantee address, once its profile is loaded.
    pub fn grantee_title(&self, grantee: &Address) -> Option<&str> {
        let entry = self.council.as_ref()?.grantee_by_account(grantee)?;
        self.profiles
            .as_ref()?
            .iter()
            .find(|p| p.id == entry.name)
            .map(|p| p.metadata.title.as_str())
    }

    /// Voting power of the connected account. Zero for non-members.
    pub fn voting_power(&self) -> Votes {
        match (&self.council, &self.account) {
            (Some(council), Some(account)) => council.voting_power(account),
            _ => 0,
        }
    }
}

/// Id of a council member entity in the council subgraph.
pub fn council_member_id(council: &Address, member: &Address) -> String {
    format!("{:#x}-{:#x}", council, member)
}

#[derive(Deserialize, Debug)]
struct GranteeAccount {
    account: Address,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MemberVotingPower {
    #[serde(deserialize_with = "de_u64")]
    voting_power: Votes,
}

#[derive(Deserialize, Debug)]
struct AllocationRecord {
    grantees: Vec<GranteeAccount>,
    amounts: Vec<String>,
}

/// Response of the latest-allocation query for one council member.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AllocationQueryResponse {
    council_member: Option<MemberVotingPower>,
    #[serde(default)]
    allocations: Vec<AllocationRecord>,
}

impl AllocationQueryResponse {
    pub fn from_json_str(input: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Pairs grantees with amounts of the most recent allocation.
    /// A member without any allocation yields an empty one.
    pub fn into_current_allocation(self) -> Result<CurrentAllocation, SessionError> {
        let voting_power = self.council_member.map(|m| m.voting_power).unwrap_or(0);
        let record = match self.allocations.into_iter().next() {
            Some(record) => record,
            None => return Ok(CurrentAllocation::new(Vec::new(), voting_power)),
        };

        if record.grantees.len() != record.amounts.len() {
            return Err(SessionError::AllocationShape {
                grantees: record.grantees.len(),
                amounts: record.amounts.len(),
            });
        }

        let allocation = record
            .grantees
            .into_iter()
            .zip(record.amounts)
            .map(|(grantee, amount)| {
                let amount = amount
                    .trim()
                    .parse::<Votes>()
                    .map_err(|_| SessionError::AmountOverflow(amount.clone()))?;
                Ok(Allocation::new(grantee.account, amount))
            })
            .collect::<Result<Vec<_>, SessionError>>()?;

        Ok(CurrentAllocation::new(allocation, voting_power))
    }
}
