use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::wire::{de_u128, de_u256, de_u64, ser_u128, ser_u256};
use crate::{utils::monthly_flow, Units};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolAccount {
    pub id: Address,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolMember {
    pub account: PoolAccount,
    #[serde(deserialize_with = "de_u128", serialize_with = "ser_u128")]
    pub units: Units,
}

/// Snapshot of the GDA distribution pool as indexed by the Superfluid subgraph.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GdaPool {
    pub id: Address,
    /// Total flow rate into the pool, wei/sec.
    #[serde(deserialize_with = "de_u256", serialize_with = "ser_u256")]
    pub flow_rate: U256,
    /// Part of the flow rate going to the adjustment member.
    #[serde(
        default,
        deserialize_with = "de_u256",
        serialize_with = "ser_u256"
    )]
    pub adjustment_flow_rate: U256,
    #[serde(deserialize_with = "de_u128", serialize_with = "ser_u128")]
    pub total_units: Units,
    /// Amount distributed up to `updated_at_timestamp`.
    #[serde(
        default,
        deserialize_with = "de_u256",
        serialize_with = "ser_u256"
    )]
    pub total_amount_flowed_distributed_until_updated_at: U256,
    #[serde(default, deserialize_with = "de_u64")]
    pub updated_at_timestamp: u64,
    #[serde(default)]
    pub pool_members: Vec<PoolMember>,
}

impl GdaPool {
    pub fn member_units(&self, account: &Address) -> Units {
        self.pool_members
            .iter()
            .find(|m| m.account.id == *account)
            .map(|m| m.units)
            .unwrap_or(0)
    }

    /// Flow rate distributed to members.
    /// Saturates at zero should the adjustment exceed the total.
    pub fn adjusted_flow_rate(&self) -> U256 {
        self.flow_rate.saturating_sub(self.adjustment_flow_rate)
    }

    pub fn monthly_distribution(&self) -> U256 {
        monthly_flow(self.flow_rate)
    }

    /// Total distributed at unix time `now`, extrapolated from the last update.
    /// A `now` before the update yields the recorded total.
    pub fn distributed_at(&self, now: u64) -> U256 {
        let elapsed = now.saturating_sub(self.updated_at_timestamp);
        self.total_amount_flowed_distributed_until_updated_at
            .saturating_add(self.flow_rate.saturating_mul(U256::from(elapsed)))
    }
}
