use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::{
    types::{wire::ser_u256, CouncilGrantee, FlowStateProfile, GdaPool, ProjectMetadata},
    utils::monthly_flow,
    GranteeKey, ProfileId, Units,
};

/// Grantee card as shown in the feed.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Grantee {
    pub id: ProfileId,
    pub address: Address,
    pub metadata: ProjectMetadata,
    /// Stream the grantee currently receives, wei/sec.
    #[serde(serialize_with = "ser_u256")]
    pub flow_rate: U256,
    pub units: Units,
}

impl Grantee {
    pub fn key(&self) -> GranteeKey {
        (self.id.clone(), self.address)
    }

    pub fn same_identity(&self, other: &Grantee) -> bool {
        self.address == other.address && self.id == other.id
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn monthly_flow(&self) -> U256 {
        monthly_flow(self.flow_rate)
    }
}

/// Pro-rata share of the pool flow for `units`.
/// Integer division truncates like the on-chain accounting does.
pub fn member_flow_rate(pool: &GdaPool, units: Units) -> U256 {
    if pool.total_units == 0 {
        return U256::ZERO;
    }
    U256::from(units).saturating_mul(pool.adjusted_flow_rate()) / U256::from(pool.total_units)
}

pub fn derive_grantee(entry: &CouncilGrantee, profile: &FlowStateProfile, pool: &GdaPool) -> Grantee {
    let units = pool.member_units(&entry.account);
    Grantee {
        id: profile.id.clone(),
        address: entry.account,
        metadata: profile.metadata.clone(),
        flow_rate: member_flow_rate(pool, units),
        units,
    }
}

/// Recomputes units and flow rate from a newer pool snapshot.
pub fn refresh(grantee: &mut Grantee, pool: &GdaPool) {
    grantee.units = pool.member_units(&grantee.address);
    grantee.flow_rate = member_flow_rate(pool, grantee.units);
}
