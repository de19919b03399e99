use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::Votes;

mod council;
mod pool;
pub mod wire;

pub use council::{Council, CouncilGrantee, CouncilMember, FlowStateProfile, ProjectMetadata};
pub use pool::{GdaPool, PoolAccount, PoolMember};

/// Votes given to a single grantee.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Allocation {
    pub grantee: Address,
    pub amount: Votes,
}

impl Allocation {
    pub fn new(grantee: Address, amount: Votes) -> Self {
        Allocation { grantee, amount }
    }
}

/// Last allocation of a council member confirmed on chain.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAllocation {
    pub allocation: Vec<Allocation>,
    pub voting_power: Votes,
}

impl CurrentAllocation {
    pub fn new(allocation: Vec<Allocation>, voting_power: Votes) -> Self {
        CurrentAllocation {
            allocation,
            voting_power,
        }
    }

    pub fn contains(&self, grantee: &Address) -> bool {
        self.allocation.iter().any(|a| a.grantee == *grantee)
    }
}
